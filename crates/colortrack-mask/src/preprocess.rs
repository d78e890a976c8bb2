//! Frame preprocessing ahead of the range test.
//!
//! Two optional steps, both aimed at uneven lighting and sensor noise:
//! - Gaussian blur of the RGB frame,
//! - CLAHE (contrast-limited adaptive histogram equalization) on the value
//!   channel only, so hue and saturation are left untouched.

use colortrack_core::HsvImage;
use image::{GrayImage, Luma, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// CLAHE settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaheParams {
    /// Histogram clip height relative to a flat histogram; `<= 0` disables
    /// clipping (plain adaptive equalization).
    pub clip_limit: f32,
    pub tiles_x: u32,
    pub tiles_y: u32,
}

impl Default for ClaheParams {
    fn default() -> Self {
        Self {
            clip_limit: 2.0,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

/// Preprocessing settings; the default does nothing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessParams {
    /// Gaussian sigma in pixels; `<= 0` skips the blur.
    pub blur_sigma: f32,
    pub clahe: Option<ClaheParams>,
}

/// Blur → RGB to HSV → CLAHE on V.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(frame, params),
        fields(width = frame.width(), height = frame.height())
    )
)]
pub fn preprocess(frame: &RgbImage, params: &PreprocessParams) -> HsvImage {
    let hsv = if params.blur_sigma > 0.0 {
        HsvImage::from_rgb(&blur_rgb(frame, params.blur_sigma))
    } else {
        HsvImage::from_rgb(frame)
    };
    match &params.clahe {
        Some(clahe_params) => equalize_value(&hsv, clahe_params),
        None => hsv,
    }
}

/// Gaussian blur; returns a copy when `sigma <= 0` or the frame is empty.
pub fn blur_rgb(frame: &RgbImage, sigma: f32) -> RgbImage {
    if sigma <= 0.0 || frame.width() == 0 || frame.height() == 0 {
        return frame.clone();
    }
    gaussian_blur_f32(frame, sigma)
}

/// Apply CLAHE to the value channel of `hsv`.
pub fn equalize_value(hsv: &HsvImage, params: &ClaheParams) -> HsvImage {
    let value = clahe(&hsv.value_channel(), params);
    let mut out = hsv.clone();
    for (px, v) in out.data.chunks_exact_mut(3).zip(value.as_raw()) {
        px[2] = *v;
    }
    out
}

/// Contrast-limited adaptive histogram equalization.
///
/// The image is split into a `tiles_x x tiles_y` grid (clamped to the image
/// size). Each tile gets a clipped-histogram equalization LUT; every pixel
/// is mapped through the four nearest tile LUTs, bilinearly weighted by its
/// distance to the tile centers.
pub fn clahe(gray: &GrayImage, params: &ClaheParams) -> GrayImage {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return gray.clone();
    }
    let tiles_x = params.tiles_x.clamp(1, w);
    let tiles_y = params.tiles_y.clamp(1, h);

    let x_edges = tile_edges(w, tiles_x);
    let y_edges = tile_edges(h, tiles_y);

    let mut luts = Vec::with_capacity((tiles_x * tiles_y) as usize);
    for ty in 0..tiles_y as usize {
        for tx in 0..tiles_x as usize {
            let (x0, x1) = (x_edges[tx], x_edges[tx + 1]);
            let (y0, y1) = (y_edges[ty], y_edges[ty + 1]);
            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[gray.get_pixel(x, y)[0] as usize] += 1;
                }
            }
            let area = (x1 - x0) * (y1 - y0);
            luts.push(equalization_lut(&mut hist, area, params.clip_limit));
        }
    }

    let tile_w = w as f32 / tiles_x as f32;
    let tile_h = h as f32 / tiles_y as f32;
    let mut out = GrayImage::new(w, h);
    for (x, y, dst) in out.enumerate_pixels_mut() {
        let (tx0, tx1, ax) = neighbors(x, tile_w, tiles_x);
        let (ty0, ty1, ay) = neighbors(y, tile_h, tiles_y);
        let v = gray.get_pixel(x, y)[0] as usize;
        let lut = |tx: usize, ty: usize| luts[ty * tiles_x as usize + tx][v] as f32;

        let top = lut(tx0, ty0) * (1.0 - ax) + lut(tx1, ty0) * ax;
        let bottom = lut(tx0, ty1) * (1.0 - ax) + lut(tx1, ty1) * ax;
        let mapped = top * (1.0 - ay) + bottom * ay;
        *dst = Luma([mapped.round().clamp(0.0, 255.0) as u8]);
    }
    out
}

fn tile_edges(len: u32, tiles: u32) -> Vec<u32> {
    (0..=tiles)
        .map(|t| (t as u64 * len as u64 / tiles as u64) as u32)
        .collect()
}

/// Indices of the two tiles whose centers bracket `pos`, and the weight of
/// the second one.
#[inline]
fn neighbors(pos: u32, tile_size: f32, tiles: u32) -> (usize, usize, f32) {
    let g = ((pos as f32 + 0.5) / tile_size - 0.5).max(0.0);
    let t0 = (g.floor() as u32).min(tiles - 1);
    let t1 = (t0 + 1).min(tiles - 1);
    let a = if t1 == t0 { 0.0 } else { (g - t0 as f32).clamp(0.0, 1.0) };
    (t0 as usize, t1 as usize, a)
}

fn equalization_lut(hist: &mut [u32; 256], area: u32, clip_limit: f32) -> [u8; 256] {
    if clip_limit > 0.0 {
        let clip = ((clip_limit * area as f32 / 256.0) as u32).max(1);
        let mut excess = 0u32;
        for bin in hist.iter_mut() {
            if *bin > clip {
                excess += *bin - clip;
                *bin = clip;
            }
        }
        let batch = excess / 256;
        let residual = (excess % 256) as usize;
        for bin in hist.iter_mut() {
            *bin += batch;
        }
        if residual > 0 {
            let step = (256 / residual).max(1);
            for bin in hist.iter_mut().step_by(step).take(residual) {
                *bin += 1;
            }
        }
    }

    let scale = 255.0 / area.max(1) as f32;
    let mut lut = [0u8; 256];
    let mut cdf = 0u32;
    for (dst, &bin) in lut.iter_mut().zip(hist.iter()) {
        cdf += bin;
        *dst = (cdf as f32 * scale).round().min(255.0) as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use colortrack_core::Hsv;
    use image::Rgb;

    fn spread(img: &GrayImage) -> u8 {
        let min = img.pixels().map(|p| p[0]).min().unwrap_or(0);
        let max = img.pixels().map(|p| p[0]).max().unwrap_or(0);
        max - min
    }

    #[test]
    fn constant_image_stays_constant() {
        let img = GrayImage::from_pixel(64, 64, Luma([200]));
        let out = clahe(&img, &ClaheParams::default());
        let first = out.get_pixel(0, 0)[0];
        assert!(out.pixels().all(|p| p[0] == first));
    }

    #[test]
    fn low_contrast_gradient_is_stretched() {
        let img = GrayImage::from_fn(128, 128, |x, _| Luma([100 + (x / 8) as u8]));
        let params = ClaheParams {
            clip_limit: 40.0,
            ..ClaheParams::default()
        };
        let out = clahe(&img, &params);
        assert_eq!(out.dimensions(), img.dimensions());
        assert!(
            spread(&out) > 2 * spread(&img),
            "spread {} -> {}",
            spread(&img),
            spread(&out)
        );
    }

    #[test]
    fn tiny_and_empty_images_are_handled() {
        let empty = GrayImage::new(0, 0);
        assert_eq!(clahe(&empty, &ClaheParams::default()).dimensions(), (0, 0));
        let tiny = GrayImage::from_fn(3, 2, |x, y| Luma([(x * 40 + y * 10) as u8]));
        assert_eq!(clahe(&tiny, &ClaheParams::default()).dimensions(), (3, 2));
    }

    #[test]
    fn equalize_value_keeps_hue_and_saturation() {
        let hsv = HsvImage::from_fn(32, 32, |x, y| Hsv::new(25, 180, (80 + x + y) as u8));
        let out = equalize_value(&hsv, &ClaheParams::default());
        for (a, b) in hsv.view().pixels().zip(out.view().pixels()) {
            assert_eq!((a.h, a.s), (b.h, b.s));
        }
    }

    #[test]
    fn default_preprocess_is_plain_conversion() {
        let frame = RgbImage::from_pixel(8, 8, Rgb([255, 255, 0]));
        let hsv = preprocess(&frame, &PreprocessParams::default());
        assert_eq!(hsv, HsvImage::from_rgb(&frame));
        assert_eq!(hsv.get(3, 3), Some(Hsv::new(30, 255, 255)));
    }

    #[test]
    fn blur_keeps_uniform_frame() {
        let frame = RgbImage::from_pixel(16, 16, Rgb([0, 0, 255]));
        let blurred = blur_rgb(&frame, 1.5);
        assert_eq!(blurred.dimensions(), (16, 16));
        let px = blurred.get_pixel(8, 8);
        assert_eq!((px[0], px[1]), (0, 0));
        assert!(px[2] >= 254);
    }
}
