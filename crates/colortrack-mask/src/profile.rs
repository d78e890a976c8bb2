//! Custom color ranges picked from a sampled pixel.

use crate::mode::YELLOW;
use colortrack_core::{rgb_to_hsv, wrap_hue, ColorRange, Hsv, HsvImageView, CHANNEL_MAX};
use image::RgbImage;
use serde::{Deserialize, Serialize};

/// Full widths of the band built around a sample, per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tolerance {
    pub h: u16,
    pub s: u16,
    pub v: u16,
}

impl Tolerance {
    pub const fn new(h: u16, s: u16, v: u16) -> Self {
        Self { h, s, v }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(30, 60, 60)
    }
}

/// A color range plus the tolerances used to rebuild it from a sample.
///
/// Updating never mutates: [`update`](Self::update) returns the new range and
/// [`with_sample`](Self::with_sample) returns a new profile, so callers pass
/// the result along explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomColorProfile {
    pub range: ColorRange,
    #[serde(default)]
    pub tolerance: Tolerance,
}

impl Default for CustomColorProfile {
    fn default() -> Self {
        Self::new(YELLOW, Tolerance::default())
    }
}

impl CustomColorProfile {
    pub fn new(range: ColorRange, tolerance: Tolerance) -> Self {
        Self { range, tolerance }
    }

    /// Range centered on `sample`: `sample ± tol/2` per channel.
    ///
    /// Hue wraps modulo the hue modulus (so a sample near red yields a
    /// wrapping range); saturation and value are clamped to `0..=255`.
    pub fn update(&self, sample: Hsv) -> ColorRange {
        let tol = self.tolerance;
        let (h, s, v) = (sample.h as i32, sample.s as i32, sample.v as i32);
        let half = |t: u16| t as i32 / 2;
        let clamp = |c: i32| c.clamp(0, CHANNEL_MAX as i32) as u8;

        let lower = Hsv::new(
            wrap_hue(h - half(tol.h)),
            clamp(s - half(tol.s)),
            clamp(v - half(tol.v)),
        );
        let upper = Hsv::new(
            wrap_hue(h + half(tol.h)),
            clamp(s + half(tol.s)),
            clamp(v + half(tol.v)),
        );
        // lower <= upper on saturation/value by construction
        ColorRange::new_unchecked(lower, upper)
    }

    /// Profile with the range rebuilt around `sample`.
    pub fn with_sample(self, sample: Hsv) -> Self {
        Self {
            range: self.update(sample),
            ..self
        }
    }
}

/// HSV value at `(x, y)`, or `None` outside the image.
pub fn sample_hsv(image: &HsvImageView<'_>, x: u32, y: u32) -> Option<Hsv> {
    image.get(x as usize, y as usize)
}

/// HSV value of the RGB pixel at `(x, y)`, or `None` outside the frame.
pub fn sample_rgb(frame: &RgbImage, x: u32, y: u32) -> Option<Hsv> {
    let px = frame.get_pixel_checked(x, y)?;
    Some(rgb_to_hsv(px[0], px[1], px[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use colortrack_core::HsvImage;
    use image::Rgb;

    fn profile(h: u16, s: u16, v: u16) -> CustomColorProfile {
        CustomColorProfile::new(YELLOW, Tolerance::new(h, s, v))
    }

    #[test]
    fn update_centers_band_on_sample() {
        let range = profile(30, 60, 60).update(Hsv::new(20, 150, 150));
        assert_eq!(range.lower, Hsv::new(5, 120, 120));
        assert_eq!(range.upper, Hsv::new(35, 180, 180));
    }

    #[test]
    fn saturation_and_value_are_clamped() {
        let range = profile(30, 60, 60).update(Hsv::new(20, 10, 250));
        assert_eq!(range.lower.s, 0);
        assert_eq!(range.upper.s, 40);
        assert_eq!(range.lower.v, 220);
        assert_eq!(range.upper.v, 255);
        assert!(range.validate().is_ok());
    }

    #[test]
    fn hue_wraps_near_origin() {
        let range = profile(30, 60, 60).update(Hsv::new(5, 200, 200));
        assert_eq!(range.lower.h, 170);
        assert_eq!(range.upper.h, 20);
        assert!(range.wraps());
        assert!(range.contains(Hsv::new(175, 200, 200)));
        assert!(range.contains(Hsv::new(15, 200, 200)));

        let high = profile(30, 60, 60).update(Hsv::new(175, 200, 200));
        assert_eq!((high.lower.h, high.upper.h), (160, 10));
    }

    #[test]
    fn odd_tolerances_are_halved_down() {
        let range = profile(29, 61, 1).update(Hsv::new(90, 100, 100));
        assert_eq!(range.lower, Hsv::new(76, 70, 100));
        assert_eq!(range.upper, Hsv::new(104, 130, 100));
    }

    #[test]
    fn with_sample_keeps_tolerance_and_leaves_original_untouched() {
        let original = profile(30, 60, 60);
        let updated = original.with_sample(Hsv::new(120, 200, 200));
        assert_eq!(original.range, YELLOW);
        assert_eq!(updated.tolerance, original.tolerance);
        assert_eq!(updated.range.lower.h, 105);
    }

    #[test]
    fn sampling_reads_pixel_or_none() {
        let img = HsvImage::from_fn(3, 2, |x, y| Hsv::new(x as u8, y as u8, 7));
        assert_eq!(sample_hsv(&img.view(), 2, 1), Some(Hsv::new(2, 1, 7)));
        assert_eq!(sample_hsv(&img.view(), 3, 0), None);

        let frame = RgbImage::from_pixel(4, 4, Rgb([0, 0, 255]));
        assert_eq!(sample_rgb(&frame, 1, 1), Some(Hsv::new(120, 255, 255)));
        assert_eq!(sample_rgb(&frame, 4, 1), None);
    }
}
