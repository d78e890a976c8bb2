use crate::morphology::{denoise, MorphologyParams};
use crate::threshold::threshold;
use colortrack_core::{ColorRange, HsvImageView, InvalidArgument};
use image::GrayImage;
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Range test followed by morphological denoising.
#[derive(Clone, Debug, Default)]
pub struct MaskBuilder {
    morphology: MorphologyParams,
}

impl MaskBuilder {
    pub fn new(morphology: MorphologyParams) -> Self {
        Self { morphology }
    }

    #[inline]
    pub fn params(&self) -> &MorphologyParams {
        &self.morphology
    }

    /// Build a 0/255 mask of the pixels of `image` inside `range`.
    ///
    /// The output has the dimensions of `image`; a zero-sized image yields
    /// an empty mask. Fails only on a malformed buffer or inverted
    /// saturation/value bounds.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, image, range),
            fields(width = image.width, height = image.height, wraps = range.wraps())
        )
    )]
    pub fn build(
        &self,
        image: &HsvImageView<'_>,
        range: &ColorRange,
    ) -> Result<GrayImage, InvalidArgument> {
        let raw = threshold(image, range)?;
        let mask = denoise(&raw, &self.morphology);
        debug!(
            "mask {}x{}: {} raw hits, {} after denoising",
            mask.width(),
            mask.height(),
            count_set(&raw),
            count_set(&mask)
        );
        Ok(mask)
    }
}

/// [`MaskBuilder::build`] with the default open/close footprint.
pub fn build_mask(
    image: &HsvImageView<'_>,
    range: &ColorRange,
) -> Result<GrayImage, InvalidArgument> {
    MaskBuilder::default().build(image, range)
}

fn count_set(mask: &GrayImage) -> usize {
    mask.as_raw().iter().filter(|&&p| p != 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use colortrack_core::{Hsv, HsvImage};

    #[test]
    fn uniform_matching_image_gives_full_mask() {
        let img = HsvImage::filled(40, 30, Hsv::new(25, 200, 200));
        let yellow = crate::YELLOW;
        let mask = build_mask(&img.view(), &yellow).expect("mask");
        assert_eq!(mask.dimensions(), (40, 30));
        assert!(mask.pixels().all(|p| p[0] == 255));
    }

    #[test]
    fn uniform_non_matching_image_gives_empty_mask() {
        let img = HsvImage::filled(40, 30, Hsv::new(90, 200, 200));
        let mask = build_mask(&img.view(), &crate::RED).expect("mask");
        assert!(mask.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn zero_sized_image_is_not_an_error() {
        let img = HsvImage::new(0, 0);
        let mask = build_mask(&img.view(), &crate::BLUE).expect("mask");
        assert_eq!(mask.dimensions(), (0, 0));
    }

    #[test]
    fn red_blob_on_both_sides_of_origin_survives_denoising() {
        // left half hue 175, right half hue 5, speckle of hue 178 elsewhere
        let img = HsvImage::from_fn(64, 48, |x, y| {
            if (10..30).contains(&y) && (10..30).contains(&x) {
                Hsv::new(175, 200, 200)
            } else if (10..30).contains(&y) && (30..50).contains(&x) {
                Hsv::new(5, 200, 200)
            } else if (x, y) == (60, 40) {
                Hsv::new(178, 200, 200)
            } else {
                Hsv::new(90, 200, 200)
            }
        });
        let mask = build_mask(&img.view(), &crate::RED).expect("mask");
        assert_eq!(mask.get_pixel(15, 15)[0], 255);
        assert_eq!(mask.get_pixel(45, 25)[0], 255);
        assert_eq!(mask.get_pixel(60, 40)[0], 0);
        let set = mask.pixels().filter(|p| p[0] != 0).count();
        assert_eq!(set, 40 * 20);
    }

    #[test]
    fn builder_without_denoising_keeps_speckles() {
        let img = HsvImage::from_fn(20, 20, |x, y| {
            if (x, y) == (3, 4) {
                Hsv::new(120, 200, 200)
            } else {
                Hsv::default()
            }
        });
        let builder = MaskBuilder::new(MorphologyParams::disabled());
        let mask = builder.build(&img.view(), &crate::BLUE).expect("mask");
        assert_eq!(mask.get_pixel(3, 4)[0], 255);
        let denoised = build_mask(&img.view(), &crate::BLUE).expect("mask");
        assert_eq!(denoised.get_pixel(3, 4)[0], 0);
    }
}
