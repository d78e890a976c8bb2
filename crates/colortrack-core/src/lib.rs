//! Core types for HSV color tracking.
//!
//! This crate holds the vocabulary shared by the rest of the workspace:
//! - [`Hsv`] colors in the 8-bit convention (hue `0..180`, saturation/value `0..=255`),
//! - [`ColorRange`] bands whose hue bounds may wrap through the cyclic origin,
//! - interleaved [`HsvImage`] buffers and RGB <-> HSV conversion,
//! - the [`InvalidArgument`] error and a minimal logger.
//!
//! It does *not* threshold, denoise or extract shapes; see `colortrack-mask`
//! and `colortrack-shapes` for that.

mod color;
mod convert;
mod error;
mod image;
mod logger;
mod range;

pub use color::{wrap_hue, Channel, Hsv, CHANNEL_MAX, HUE_MAX, HUE_MODULUS};
pub use convert::{hsv_to_rgb, rgb_to_hsv};
pub use error::InvalidArgument;
pub use image::{HsvImage, HsvImageView};
pub use range::ColorRange;

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, tracing_filter};

pub use logger::{init_from_str, init_with_level};
