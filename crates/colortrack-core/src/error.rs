use crate::color::Channel;

/// Precondition violations on images and color ranges.
///
/// This is the only failure mode of mask construction: every valid
/// `(image, range)` pair produces a mask.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("inverted {channel} bounds (lower={lower}, upper={upper})")]
    InvertedBounds {
        channel: Channel,
        lower: u8,
        upper: u8,
    },

    #[error("invalid HSV image buffer length (expected {expected} bytes, got {got})")]
    BufferLength { expected: usize, got: usize },

    #[error("invalid image dimensions (width={width}, height={height})")]
    Dimensions { width: usize, height: usize },

    #[error("image size mismatch (expected {expected:?}, got {got:?})")]
    SizeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
}
