use ::image::{GrayImage, Luma, Rgb, RgbImage};

use crate::color::Hsv;
use crate::convert::{hsv_to_rgb, rgb_to_hsv};
use crate::error::InvalidArgument;

/// Borrowed interleaved HSV buffer.
#[derive(Clone, Copy, Debug)]
pub struct HsvImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major h,s,v triples, len = w*h*3
}

/// Owned interleaved HSV buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HsvImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

fn expected_len(width: usize, height: usize) -> Result<usize, InvalidArgument> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(3))
        .ok_or(InvalidArgument::Dimensions { width, height })
}

impl<'a> HsvImageView<'a> {
    /// Check that the buffer length agrees with the declared dimensions.
    pub fn validate(&self) -> Result<(), InvalidArgument> {
        let expected = expected_len(self.width, self.height)?;
        if self.data.len() != expected {
            return Err(InvalidArgument::BufferLength {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Hsv> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 3;
        let px = self.data.get(i..i + 3)?;
        Some(Hsv::new(px[0], px[1], px[2]))
    }

    /// Pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Hsv> + 'a {
        self.data
            .chunks_exact(3)
            .map(|px| Hsv::new(px[0], px[1], px[2]))
    }
}

impl HsvImage {
    /// Black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Hsv::default())
    }

    pub fn filled(width: usize, height: usize, color: Hsv) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> Hsv) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                let c = f(x, y);
                data.extend_from_slice(&[c.h, c.s, c.v]);
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap a raw interleaved buffer, rejecting a length mismatch.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, InvalidArgument> {
        HsvImageView {
            width,
            height,
            data: &data,
        }
        .validate()?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn view(&self) -> HsvImageView<'_> {
        HsvImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Hsv> {
        self.view().get(x, y)
    }

    /// Overwrite one pixel; out-of-bounds writes are ignored.
    pub fn put(&mut self, x: usize, y: usize, color: Hsv) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&[color.h, color.s, color.v]);
    }

    /// Convert an RGB frame into HSV.
    pub fn from_rgb(rgb: &RgbImage) -> Self {
        let width = rgb.width() as usize;
        let height = rgb.height() as usize;
        let mut data = Vec::with_capacity(width * height * 3);
        for px in rgb.pixels() {
            let c = rgb_to_hsv(px[0], px[1], px[2]);
            data.extend_from_slice(&[c.h, c.s, c.v]);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Convert back to RGB, e.g. to draw overlays on a preprocessed frame.
    pub fn to_rgb(&self) -> RgbImage {
        let mut out = RgbImage::new(self.width as u32, self.height as u32);
        for (dst, c) in out.pixels_mut().zip(self.view().pixels()) {
            *dst = Rgb(hsv_to_rgb(c));
        }
        out
    }

    /// The V channel as a grayscale image.
    pub fn value_channel(&self) -> GrayImage {
        let mut out = GrayImage::new(self.width as u32, self.height as u32);
        for (dst, px) in out.pixels_mut().zip(self.data.chunks_exact(3)) {
            *dst = Luma([px[2]]);
        }
        out
    }

    /// Copy of this image with the V channel replaced.
    pub fn with_value_channel(&self, value: &GrayImage) -> Result<Self, InvalidArgument> {
        let got = (value.width() as usize, value.height() as usize);
        if got != (self.width, self.height) {
            return Err(InvalidArgument::SizeMismatch {
                expected: (self.width, self.height),
                got,
            });
        }
        let mut out = self.clone();
        for (px, v) in out.data.chunks_exact_mut(3).zip(value.as_raw()) {
            px[2] = *v;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_short_buffer() {
        let err = HsvImage::from_raw(2, 2, vec![0; 11]).unwrap_err();
        assert_eq!(
            err,
            InvalidArgument::BufferLength {
                expected: 12,
                got: 11
            }
        );
    }

    #[test]
    fn zero_sized_image_is_valid_and_empty() {
        let img = HsvImage::from_raw(0, 0, Vec::new()).expect("empty image");
        assert!(img.view().is_empty());
        assert_eq!(img.view().pixels().count(), 0);
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        let view = HsvImageView {
            width: usize::MAX,
            height: 2,
            data: &[],
        };
        let err = view.validate().unwrap_err();
        assert!(matches!(err, InvalidArgument::Dimensions { .. }));
    }

    #[test]
    fn get_and_put_address_row_major() {
        let mut img = HsvImage::new(3, 2);
        img.put(2, 1, Hsv::new(7, 8, 9));
        img.put(5, 5, Hsv::new(1, 1, 1));
        assert_eq!(img.get(2, 1), Some(Hsv::new(7, 8, 9)));
        assert_eq!(&img.data[15..18], &[7, 8, 9]);
        assert_eq!(img.get(3, 0), None);
    }

    #[test]
    fn value_channel_round_trip() {
        let img = HsvImage::from_fn(4, 3, |x, y| Hsv::new(10, 20, (x + 4 * y) as u8));
        let mut v = img.value_channel();
        assert_eq!(v.get_pixel(3, 2)[0], 11);
        for p in v.pixels_mut() {
            p[0] = 255 - p[0];
        }
        let out = img.with_value_channel(&v).expect("same size");
        assert_eq!(out.get(0, 0), Some(Hsv::new(10, 20, 255)));
        assert_eq!(out.get(3, 2), Some(Hsv::new(10, 20, 244)));
    }

    #[test]
    fn with_value_channel_rejects_other_size() {
        let img = HsvImage::new(4, 3);
        let v = GrayImage::new(3, 4);
        let err = img.with_value_channel(&v).unwrap_err();
        assert!(matches!(err, InvalidArgument::SizeMismatch { .. }));
    }
}
