//! Per-pixel color-range test.

use colortrack_core::{ColorRange, HsvImageView, InvalidArgument};
use image::{GrayImage, Luma};

#[cfg(feature = "tracing")]
use tracing::instrument;

const SET: Luma<u8> = Luma([255]);

pub(crate) fn mask_dimensions(image: &HsvImageView<'_>) -> Result<(u32, u32), InvalidArgument> {
    let w = u32::try_from(image.width).ok();
    let h = u32::try_from(image.height).ok();
    w.zip(h).ok_or(InvalidArgument::Dimensions {
        width: image.width,
        height: image.height,
    })
}

/// Mark every pixel inside `range` with 255, everything else with 0.
///
/// A wrapping hue band is evaluated as the union of its two non-wrapping
/// halves, both sharing the saturation/value bounds. A zero-sized image
/// yields an empty mask.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(image, range),
        fields(width = image.width, height = image.height)
    )
)]
pub fn threshold(
    image: &HsvImageView<'_>,
    range: &ColorRange,
) -> Result<GrayImage, InvalidArgument> {
    image.validate()?;
    range.validate()?;
    let (w, h) = mask_dimensions(image)?;

    let mut mask = GrayImage::new(w, h);
    if image.is_empty() {
        return Ok(mask);
    }

    let (first, second) = range.split();
    for (dst, px) in mask.pixels_mut().zip(image.pixels()) {
        let hit = first.contains_flat(px) || second.is_some_and(|r| r.contains_flat(px));
        if hit {
            *dst = SET;
        }
    }
    Ok(mask)
}
