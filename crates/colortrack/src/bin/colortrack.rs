use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colortrack::core::{ColorRange, Hsv, InvalidArgument};
use colortrack::io::{run_tracking, write_json, TrackConfig};
use colortrack::mask::preprocess::preprocess;
use colortrack::mask::{
    sample_rgb, ClaheParams, CustomColorProfile, MaskBuilder, MorphologyParams, PreprocessParams,
    RangeTable, ThresholdMode, Tolerance,
};
use colortrack::{Selection, TrackError};
use log::info;
use serde::Serialize;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Usage(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "colortrack",
    version,
    about = "Track colored objects through image frames with HSV masks"
)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit JSON log lines
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the denoised color mask of one image
    Mask(MaskArgs),
    /// Print the HSV value of a pixel and the custom range built around it
    Sample(SampleArgs),
    /// Track the object through a list of frames and write a JSON report
    Track(TrackArgs),
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// Color to track: none, blue, yellow, red or custom
    #[arg(long, default_value = "yellow")]
    mode: ThresholdMode,

    /// Custom lower bound `h,s,v` (implies `--mode custom`)
    #[arg(long, value_parser = parse_hsv, requires = "upper")]
    lower: Option<Hsv>,

    /// Custom upper bound `h,s,v`
    #[arg(long, value_parser = parse_hsv, requires = "lower")]
    upper: Option<Hsv>,

    /// Band widths `h,s,v` used when building a range from a sample
    #[arg(long, value_parser = parse_tolerance, default_value = "30,60,60")]
    tolerance: Tolerance,
}

impl RangeArgs {
    fn mode(&self) -> ThresholdMode {
        if self.lower.is_some() {
            ThresholdMode::Custom
        } else {
            self.mode
        }
    }

    fn profile(&self) -> Result<CustomColorProfile, InvalidArgument> {
        let mut profile = CustomColorProfile {
            tolerance: self.tolerance,
            ..CustomColorProfile::default()
        };
        if let (Some(lower), Some(upper)) = (self.lower, self.upper) {
            profile.range = ColorRange::new(lower, upper)?;
        }
        Ok(profile)
    }
}

#[derive(Args, Debug)]
struct PreprocessArgs {
    /// Gaussian blur sigma in pixels (0 disables)
    #[arg(long, default_value_t = 0.0)]
    blur: f32,

    /// Equalize the value channel with CLAHE
    #[arg(long)]
    clahe: bool,

    /// Open/close footprint radius (0 disables denoising)
    #[arg(long, default_value_t = 5)]
    radius: u8,
}

impl PreprocessArgs {
    fn preprocess(&self) -> PreprocessParams {
        PreprocessParams {
            blur_sigma: self.blur,
            clahe: self.clahe.then(ClaheParams::default),
        }
    }

    fn morphology(&self) -> MorphologyParams {
        MorphologyParams {
            radius: self.radius,
            ..MorphologyParams::default()
        }
    }
}

#[derive(Args, Debug)]
struct MaskArgs {
    /// Input image
    input: PathBuf,

    /// Output mask (PNG)
    #[arg(short, long)]
    output: PathBuf,

    /// Rebuild the custom range around pixel `x,y` of the input
    #[arg(long, value_parser = parse_xy)]
    sample: Option<(u32, u32)>,

    #[command(flatten)]
    range: RangeArgs,

    #[command(flatten)]
    preprocess: PreprocessArgs,
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Input image
    input: PathBuf,

    /// Pixel `x,y`
    #[arg(long, value_parser = parse_xy)]
    at: (u32, u32),

    /// Band widths `h,s,v`
    #[arg(long, value_parser = parse_tolerance, default_value = "30,60,60")]
    tolerance: Tolerance,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[value(rename_all = "lowercase")]
enum CliSelection {
    Largest,
    All,
}

impl From<CliSelection> for Selection {
    fn from(value: CliSelection) -> Self {
        match value {
            CliSelection::Largest => Selection::Largest,
            CliSelection::All => Selection::All,
        }
    }
}

#[derive(Args, Debug)]
struct TrackArgs {
    /// Frames, in order
    #[arg(required_unless_present = "config")]
    frames: Vec<String>,

    /// JSON config; command-line frames and flags are ignored when given
    #[arg(long, conflicts_with = "frames")]
    config: Option<PathBuf>,

    /// Rebuild the custom range around pixel `x,y` of the first frame
    #[arg(long, value_parser = parse_xy)]
    sample: Option<(u32, u32)>,

    #[command(flatten)]
    range: RangeArgs,

    #[arg(long, value_enum, default_value = "largest")]
    selection: CliSelection,

    /// Directory for masks, overlays and the report
    #[arg(long, default_value = "colortrack_out")]
    output_dir: String,

    /// Write one mask PNG per frame
    #[arg(long)]
    masks: bool,

    /// Write one annotated PNG per frame
    #[arg(long)]
    overlays: bool,

    /// Report path (default `<output-dir>/report.json`)
    #[arg(long)]
    report: Option<String>,
}

impl TrackArgs {
    fn to_config(&self) -> Result<TrackConfig, CliError> {
        if let Some(path) = &self.config {
            return Ok(TrackConfig::load_json(path)?);
        }
        let mut config = TrackConfig::new(self.frames.clone(), self.range.mode());
        config.custom = Some(self.range.profile()?);
        config.sample = self.sample.map(|(x, y)| [x, y]);
        if config.sample.is_some() {
            config.mode = ThresholdMode::Custom;
        }
        config.tracker.selection = self.selection.into();
        config.output_dir = self.output_dir.clone();
        config.write_masks = self.masks;
        config.write_overlays = self.overlays;
        config.report_path = self.report.clone();
        Ok(config)
    }
}

#[derive(Serialize)]
struct SampleOutput {
    x: u32,
    y: u32,
    hsv: Hsv,
    range: ColorRange,
}

fn parse_triple(s: &str) -> Result<[u16; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [a, b, c] = parts.as_slice() else {
        return Err(format!("expected three comma-separated values, got {s:?}"));
    };
    let parse = |v: &str| v.parse::<u16>().map_err(|e| format!("{v:?}: {e}"));
    Ok([parse(a)?, parse(b)?, parse(c)?])
}

fn parse_hsv(s: &str) -> Result<Hsv, String> {
    let [h, s, v] = parse_triple(s)?;
    let channel = |c: u16| u8::try_from(c).map_err(|_| format!("{c} is out of range 0..=255"));
    Ok(Hsv::new(channel(h)?, channel(s)?, channel(v)?))
}

fn parse_tolerance(s: &str) -> Result<Tolerance, String> {
    let [h, s, v] = parse_triple(s)?;
    Ok(Tolerance::new(h, s, v))
}

fn parse_xy(s: &str) -> Result<(u32, u32), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got {s:?}"))?;
    let parse = |v: &str| v.trim().parse::<u32>().map_err(|e| format!("{v:?}: {e}"));
    Ok((parse(x)?, parse(y)?))
}

fn read_rgb(path: &Path) -> Result<image::RgbImage, CliError> {
    Ok(image::open(path)?.to_rgb8())
}

fn run_mask(args: &MaskArgs) -> Result<(), CliError> {
    let frame = read_rgb(&args.input)?;
    let mut profile = args.range.profile()?;
    let mut mode = args.range.mode();
    if let Some((x, y)) = args.sample {
        let hsv = sample_rgb(&frame, x, y).ok_or_else(|| outside(x, y, &frame))?;
        profile = profile.with_sample(hsv);
        mode = ThresholdMode::Custom;
    }

    let range = RangeTable::new(profile).resolve(mode);
    let mask = match range {
        Some(range) => {
            let hsv = preprocess(&frame, &args.preprocess.preprocess());
            MaskBuilder::new(args.preprocess.morphology()).build(&hsv.view(), &range)?
        }
        None => image::GrayImage::new(frame.width(), frame.height()),
    };
    mask.save(&args.output)?;

    let set = mask.pixels().filter(|p| p[0] != 0).count();
    info!("mode {mode}, range {range:?}");
    println!(
        "mask {}x{}: {} pixels set -> {}",
        mask.width(),
        mask.height(),
        set,
        args.output.display()
    );
    Ok(())
}

fn run_sample(args: &SampleArgs) -> Result<(), CliError> {
    let frame = read_rgb(&args.input)?;
    let (x, y) = args.at;
    let hsv = sample_rgb(&frame, x, y).ok_or_else(|| outside(x, y, &frame))?;
    let profile = CustomColorProfile {
        tolerance: args.tolerance,
        ..CustomColorProfile::default()
    };
    let out = SampleOutput {
        x,
        y,
        hsv,
        range: profile.update(hsv),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run_track(args: &TrackArgs) -> Result<(), CliError> {
    let config = args.to_config()?;
    let mut source = config.source();
    let report = run_tracking(&config, &mut source)?;

    let report_path = config.report_path();
    if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    write_json(&report_path, &report)?;
    println!(
        "tracked {} of {} frames ({} failed) -> {}",
        report.tracked(),
        report.frames.len(),
        report.failed(),
        report_path.display()
    );
    Ok(())
}

fn outside(x: u32, y: u32, frame: &image::RgbImage) -> CliError {
    CliError::Usage(format!(
        "pixel ({x}, {y}) is outside the {}x{} image",
        frame.width(),
        frame.height()
    ))
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) {
    let filter = colortrack::core::tracing_filter(&cli.log_level);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
    // no-op when the subscriber already bridged `log`
    let _ = tracing_log::LogTracer::init();
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) {
    if let Err(err) = colortrack::core::init_from_str(&cli.log_level) {
        eprintln!("failed to install logger: {err}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = match &cli.command {
        Command::Mask(args) => run_mask(args),
        Command::Sample(args) => run_sample(args),
        Command::Track(args) => run_track(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
