//! JSON configuration and report helpers for tracking over image files.

use crate::error::TrackError;
use crate::overlay::{draw_overlay, OverlayStyle};
use crate::source::{Frame, FrameSource, ImageSequence};
use crate::track::{ColorTracker, FrameResult, TrackerParams};
use colortrack_core::ColorRange;
use colortrack_mask::{sample_rgb, CustomColorProfile, RangeTable, ThresholdMode};
use colortrack_shapes::BoundingRect;
use log::{debug, info, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Read and parse a JSON file.
pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, TrackError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write `value` as pretty JSON.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<(), TrackError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn default_output_dir() -> String {
    "colortrack_out".to_string()
}

/// Configuration for a tracking run over a list of frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    pub frames: Vec<String>,
    #[serde(default)]
    pub mode: ThresholdMode,
    /// Starting profile for `mode = custom`.
    #[serde(default)]
    pub custom: Option<CustomColorProfile>,
    /// Pixel `[x, y]` of the first frame to rebuild the custom range around.
    #[serde(default)]
    pub sample: Option<[u32; 2]>,
    #[serde(default)]
    pub tracker: TrackerParams,
    #[serde(default)]
    pub overlay: OverlayStyle,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub write_masks: bool,
    #[serde(default)]
    pub write_overlays: bool,
    #[serde(default)]
    pub report_path: Option<String>,
}

impl TrackConfig {
    pub fn new(frames: Vec<String>, mode: ThresholdMode) -> Self {
        Self {
            frames,
            mode,
            custom: None,
            sample: None,
            tracker: TrackerParams::default(),
            overlay: OverlayStyle::default(),
            output_dir: default_output_dir(),
            write_masks: false,
            write_overlays: false,
            report_path: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TrackError> {
        load_json(path)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TrackError> {
        write_json(path, self)
    }

    /// Resolve the output report path.
    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(&self.output_dir).join("report.json"))
    }

    pub fn range_table(&self) -> RangeTable {
        RangeTable::new(self.custom.unwrap_or_default())
    }

    pub fn source(&self) -> ImageSequence {
        ImageSequence::new(&self.frames)
    }
}

/// Per-frame outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub index: usize,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub center: Option<[i32; 2]>,
    #[serde(default)]
    pub bounds: Option<BoundingRect>,
    #[serde(default)]
    pub area: Option<f64>,
    pub num_detections: usize,
    #[serde(default)]
    pub mask_path: Option<String>,
    #[serde(default)]
    pub overlay_path: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackReport {
    pub mode: ThresholdMode,
    /// Range thresholded, after any custom sampling.
    #[serde(default)]
    pub range: Option<ColorRange>,
    pub frames: Vec<FrameReport>,
}

impl TrackReport {
    pub fn new(mode: ThresholdMode, range: Option<ColorRange>) -> Self {
        Self {
            mode,
            range,
            frames: Vec::new(),
        }
    }

    /// Frames with a target.
    pub fn tracked(&self) -> usize {
        self.frames.iter().filter(|f| f.center.is_some()).count()
    }

    /// Frames that failed to load or process.
    pub fn failed(&self) -> usize {
        self.frames.iter().filter(|f| f.error.is_some()).count()
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TrackError> {
        load_json(path)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), TrackError> {
        write_json(path, self)
    }
}

/// Track every frame of `source`, writing masks/overlays as configured.
///
/// Frames that fail to decode or process are logged, recorded with their
/// error in the report and skipped; the trail records a gap for them.
pub fn run_tracking<S: FrameSource>(
    config: &TrackConfig,
    source: &mut S,
) -> Result<TrackReport, TrackError> {
    let out_dir = PathBuf::from(&config.output_dir);
    if config.write_masks || config.write_overlays {
        fs::create_dir_all(&out_dir)?;
    }

    let mut table = config.range_table();
    let mut sampled = config.sample.is_none() || config.mode != ThresholdMode::Custom;
    let mut tracker = ColorTracker::new(config.tracker.clone());
    let mut frames = Vec::new();
    let mut index = 0usize;

    while let Some(next) = source.next_frame() {
        let frame = match next {
            Ok(frame) => frame,
            Err(err) => {
                warn!("skipping frame {index}: {err}");
                tracker.skip_frame();
                frames.push(FrameReport {
                    index,
                    error: Some(err.to_string()),
                    ..FrameReport::default()
                });
                index += 1;
                continue;
            }
        };
        index = frame.index + 1;

        if !sampled {
            sampled = true;
            if let Some([x, y]) = config.sample {
                match sample_rgb(&frame.image, x, y) {
                    Some(hsv) => {
                        let custom = table.custom.with_sample(hsv);
                        info!("custom range from {hsv} at ({x}, {y}): {:?}", custom.range);
                        table = table.with_custom(custom);
                    }
                    None => warn!("sample ({x}, {y}) outside frame {}", frame.index),
                }
            }
        }

        let range = table.resolve(config.mode);
        let report = track_frame(config, &out_dir, &mut tracker, &frame, range.as_ref());
        frames.push(report);
    }

    let mut report = TrackReport::new(config.mode, table.resolve(config.mode));
    report.frames = frames;
    info!(
        "tracked {} of {} frames ({} failed)",
        report.tracked(),
        report.frames.len(),
        report.failed()
    );
    Ok(report)
}

fn track_frame(
    config: &TrackConfig,
    out_dir: &Path,
    tracker: &mut ColorTracker,
    frame: &Frame,
    range: Option<&ColorRange>,
) -> FrameReport {
    let mut report = FrameReport {
        index: frame.index,
        path: frame.path.as_ref().map(|p| p.display().to_string()),
        ..FrameReport::default()
    };

    let result = match tracker.process(&frame.image, range) {
        Ok(result) => result,
        Err(err) => {
            warn!("frame {} failed: {err}", frame.index);
            tracker.skip_frame();
            report.error = Some(err.to_string());
            return report;
        }
    };

    report.num_detections = result.detections.len();
    if let Some(det) = result.primary() {
        let c = det.center();
        report.center = Some([c.x, c.y]);
        report.bounds = Some(det.bounds);
        report.area = Some(det.area);
    }

    let written = write_outputs(config, out_dir, tracker, frame, &result, &mut report);
    if let Err(err) = written {
        warn!("frame {}: failed to write outputs: {err}", frame.index);
        report.error = Some(err.to_string());
    }
    debug!("frame {}: {:?}", frame.index, report.center);
    report
}

fn write_outputs(
    config: &TrackConfig,
    out_dir: &Path,
    tracker: &ColorTracker,
    frame: &Frame,
    result: &FrameResult,
    report: &mut FrameReport,
) -> Result<(), TrackError> {
    if config.write_masks {
        let path = out_dir.join(format!("mask_{:04}.png", frame.index));
        result.mask.save(&path)?;
        report.mask_path = Some(path.display().to_string());
    }
    if config.write_overlays {
        let path = out_dir.join(format!("overlay_{:04}.png", frame.index));
        draw_overlay(&frame.image, result, tracker.trail(), &config.overlay).save(&path)?;
        report.overlay_path = Some(path.display().to_string());
    }
    Ok(())
}
