//! Track a yellow disc moving across synthetic frames.
//!
//! Usage: `track_frames [config.json]`. Without an argument the frames are
//! rendered into `tmpdata/track_frames/` and `testdata/track_config.json` is
//! used.

use colortrack::io::{run_tracking, TrackConfig};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use colortrack::core::init_tracing;

const FRAME_DIR: &str = "tmpdata/track_frames";

fn render_frames(dir: &Path, count: u32) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    for i in 0..count {
        let mut frame = RgbImage::from_pixel(640, 480, Rgb([40, 70, 40]));
        let cx = 200 + 20 * i as i32;
        let cy = 240 + ((i as f32 * 0.8).sin() * 40.0) as i32;
        draw_filled_circle_mut(&mut frame, (cx, cy), 35, Rgb([245, 210, 30]));
        frame.save(dir.join(format!("frame_{i:03}.png")))?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    init_tracing(false);
    #[cfg(not(feature = "tracing"))]
    colortrack::core::init_with_level(log::LevelFilter::Info)?;

    let config_path = match std::env::args().nth(1) {
        Some(path) => PathBuf::from(path),
        None => {
            render_frames(Path::new(FRAME_DIR), 8)?;
            PathBuf::from("testdata/track_config.json")
        }
    };
    let config = TrackConfig::load_json(&config_path)?;

    let report = run_tracking(&config, &mut config.source())?;
    for frame in &report.frames {
        match (&frame.center, &frame.error) {
            (_, Some(err)) => println!("frame {:>3}: error {err}", frame.index),
            (Some([x, y]), None) => println!("frame {:>3}: center ({x}, {y})", frame.index),
            (None, None) => println!("frame {:>3}: no target", frame.index),
        }
    }

    let report_path = config.report_path();
    std::fs::create_dir_all(&config.output_dir)?;
    report.write_json(&report_path)?;
    println!("report written to {}", report_path.display());
    Ok(())
}
