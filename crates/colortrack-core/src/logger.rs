//! Logging setup shared by the library crates, the CLI and the examples.
//!
//! The `log` backend writes one line per record to stderr, tagged with the
//! pipeline stage that emitted it:
//!
//! ```text
//! [  0.412s DEBUG mask::builder] mask 640x480: 5123 raw hits, 4980 after denoising
//! [  0.431s  WARN track] skipping frame 3: ...
//! ```
//!
//! Records from the colortrack crates pass at the configured level. Records
//! from dependencies (image decoders and the like) pass at `warn` and above.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

#[cfg(any(feature = "tracing", test))]
const CRATES: [&str; 4] = [
    "colortrack",
    "colortrack_core",
    "colortrack_mask",
    "colortrack_shapes",
];

/// Stage label for a log target: `colortrack_mask::builder` is
/// `mask::builder`, `colortrack::track` is `track`. Foreign targets are kept.
fn stage(target: &str) -> &str {
    if let Some(rest) = target.strip_prefix("colortrack_") {
        return rest;
    }
    match target.strip_prefix("colortrack") {
        Some("") => target,
        Some(rest) => rest.strip_prefix("::").unwrap_or(target),
        None => target,
    }
}

fn is_own(target: &str) -> bool {
    target == "colortrack"
        || target.starts_with("colortrack::")
        || target.starts_with("colortrack_")
}

struct StageLogger {
    level: LevelFilter,
    started: Instant,
}

impl StageLogger {
    fn cap(&self, target: &str) -> LevelFilter {
        if is_own(target) {
            self.level
        } else {
            self.level.min(LevelFilter::Warn)
        }
    }
}

impl Log for StageLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.cap(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{:7.3}s {:>5} {}] {}",
            elapsed,
            record.level(),
            stage(record.target()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StageLogger> = OnceLock::new();

/// Install the stderr logger; colortrack records pass at `level`.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| StageLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}

/// Like [`init_with_level`], parsing names such as `"debug"` or `"warn"`.
/// Unknown names fall back to `info`.
pub fn init_from_str(level: &str) -> Result<(), log::SetLoggerError> {
    let level = LevelFilter::from_str(level).unwrap_or(LevelFilter::Info);
    init_with_level(level)
}

#[cfg(any(feature = "tracing", test))]
fn directives(level: &str) -> String {
    CRATES.iter().fold(String::from("warn"), |mut acc, krate| {
        acc.push(',');
        acc.push_str(krate);
        acc.push('=');
        acc.push_str(level);
        acc
    })
}

/// `RUST_LOG` when set, otherwise colortrack crates at `level` and
/// everything else at `warn`.
#[cfg(feature = "tracing")]
pub fn tracing_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)))
}

/// Install a `tracing` subscriber at `info` (see [`tracing_filter`]).
///
/// Closing spans are reported, so every instrumented stage (threshold,
/// denoise, contours, the per-frame `process`) logs its busy time. JSON
/// lines carry the enclosing frame span's fields.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool) {
    let filter = tracing_filter("info");
    if json {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(fmt::time::Uptime::default())
            .compact()
            .finish()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_strips_crate_prefix() {
        assert_eq!(stage("colortrack_mask::builder"), "mask::builder");
        assert_eq!(stage("colortrack_shapes"), "shapes");
        assert_eq!(stage("colortrack::track"), "track");
        assert_eq!(stage("colortrack"), "colortrack");
        assert_eq!(stage("colortracker::x"), "colortracker::x");
        assert_eq!(stage("png::decoder"), "png::decoder");
    }

    #[test]
    fn dependencies_are_capped_at_warn() {
        let logger = StageLogger {
            level: LevelFilter::Debug,
            started: Instant::now(),
        };
        assert_eq!(logger.cap("colortrack::io"), LevelFilter::Debug);
        assert_eq!(logger.cap("colortrack_mask::denoise"), LevelFilter::Debug);
        assert_eq!(logger.cap("image::codecs::png"), LevelFilter::Warn);

        let quiet = StageLogger {
            level: LevelFilter::Error,
            started: Instant::now(),
        };
        assert_eq!(quiet.cap("png"), LevelFilter::Error);
    }

    #[test]
    fn default_directives_scope_colortrack_crates() {
        assert_eq!(
            directives("debug"),
            "warn,colortrack=debug,colortrack_core=debug,colortrack_mask=debug,colortrack_shapes=debug"
        );
    }
}
