//! Color-range masks for HSV frames.
//!
//! The pipeline is:
//! 1. optional preprocessing ([`preprocess`]): Gaussian blur of the RGB frame
//!    and CLAHE on the value channel,
//! 2. per-pixel range test ([`threshold`]), where a hue band wrapping through
//!    the origin is the union of two non-wrapping tests,
//! 3. morphological opening then closing ([`denoise`]).
//!
//! [`MaskBuilder`] bundles steps 2 and 3. [`CustomColorProfile`] and
//! [`RangeTable`] pick the range to threshold.

mod builder;
mod mode;
mod morphology;
pub mod preprocess;
mod profile;
mod threshold;

pub use builder::{build_mask, MaskBuilder};
pub use mode::{ParseModeError, RangeTable, ThresholdMode, BLUE, RED, YELLOW};
pub use morphology::{denoise, Footprint, MorphologyParams};
pub use preprocess::{ClaheParams, PreprocessParams};
pub use profile::{sample_hsv, sample_rgb, CustomColorProfile, Tolerance};
pub use threshold::threshold;

pub use colortrack_core::{ColorRange, Hsv, HsvImage, HsvImageView, InvalidArgument};
