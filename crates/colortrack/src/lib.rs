//! High-level facade crate for the `colortrack-*` workspace.
//!
//! This crate provides:
//! - re-exports of the underlying crates,
//! - [`ColorTracker`], the per-frame pipeline: preprocessing, HSV mask,
//!   contours, shape selection and the motion trail,
//! - overlay rendering, JSON config/report helpers and the `colortrack` CLI
//!   (feature `cli`).
//!
//! ## Quickstart
//!
//! ```no_run
//! use colortrack::{ColorTracker, ThresholdMode, TrackerParams};
//! use colortrack::mask::RangeTable;
//! use image::ImageReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = ImageReader::open("frame.png")?.decode()?.to_rgb8();
//! let table = RangeTable::default();
//! let mut tracker = ColorTracker::new(TrackerParams::default());
//!
//! let result = tracker.process(&frame, table.resolve(ThresholdMode::Red).as_ref())?;
//! println!("target: {:?}", result.target);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `colortrack::core`: HSV colors, ranges, images, conversion, logger.
//! - `colortrack::mask`: range test, denoising, preprocessing, color modes.
//! - `colortrack::shapes`: contours, shape measurements, trails.
//! - `colortrack::io`: JSON configs and reports, batch tracking over files.

pub use colortrack_core as core;
pub use colortrack_mask as mask;
pub use colortrack_shapes as shapes;

pub use colortrack_core::{ColorRange, Hsv, HsvImage, InvalidArgument};
pub use colortrack_mask::{CustomColorProfile, ThresholdMode};

mod error;
pub mod io;
pub mod overlay;
mod source;
mod track;

pub use error::TrackError;
pub use overlay::{draw_overlay, OverlayStyle};
pub use source::{Frame, FrameSource, ImageSequence};
pub use track::{ColorTracker, FrameResult, Selection, TrackerParams};
