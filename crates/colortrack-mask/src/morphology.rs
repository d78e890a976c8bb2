//! Speckle removal and hole filling on binary masks.

use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::{close, open};
use serde::{Deserialize, Serialize};

/// Shape of the structuring neighborhood.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Footprint {
    /// `(2r+1) x (2r+1)` square (chessboard distance).
    #[default]
    Square,
    /// Diamond of radius `r` (city-block distance).
    Diamond,
}

impl Footprint {
    fn norm(self) -> Norm {
        match self {
            Footprint::Square => Norm::LInf,
            Footprint::Diamond => Norm::L1,
        }
    }
}

/// Parameters of the open-then-close denoising pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphologyParams {
    /// Footprint radius in pixels; `0` disables denoising.
    pub radius: u8,
    pub footprint: Footprint,
    /// Erode then dilate: removes foreground specks smaller than the footprint.
    pub open: bool,
    /// Dilate then erode: fills background holes smaller than the footprint.
    pub close: bool,
}

impl Default for MorphologyParams {
    fn default() -> Self {
        Self {
            radius: 5,
            footprint: Footprint::Square,
            open: true,
            close: true,
        }
    }
}

impl MorphologyParams {
    /// No denoising at all.
    pub fn disabled() -> Self {
        Self {
            radius: 0,
            open: false,
            close: false,
            ..Self::default()
        }
    }
}

/// Opening followed by closing with a fixed footprint.
pub fn denoise(mask: &GrayImage, params: &MorphologyParams) -> GrayImage {
    let (w, h) = mask.dimensions();
    if params.radius == 0 || w == 0 || h == 0 {
        return mask.clone();
    }

    let norm = params.footprint.norm();
    let mut out = if params.open {
        open(mask, norm, params.radius)
    } else {
        mask.clone()
    };
    if params.close {
        out = close(&out, norm, params.radius);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn rect_mask(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            if (x0..x1).contains(&x) && (y0..y1).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    fn count_set(mask: &GrayImage) -> usize {
        mask.pixels().filter(|p| p[0] != 0).count()
    }

    #[test]
    fn solid_region_larger_than_footprint_is_preserved() {
        let mask = rect_mask(80, 60, 20, 15, 55, 45);
        let params = MorphologyParams {
            radius: 3,
            ..MorphologyParams::default()
        };
        assert_eq!(denoise(&mask, &params), mask);
        assert_eq!(denoise(&mask, &MorphologyParams::default()), mask);
    }

    #[test]
    fn isolated_speckles_are_removed() {
        let mut mask = rect_mask(60, 60, 10, 10, 40, 40);
        for (x, y) in [(50, 5), (52, 50), (3, 55)] {
            mask.put_pixel(x, y, Luma([255]));
        }
        let out = denoise(&mask, &MorphologyParams::default());
        assert_eq!(count_set(&out), 30 * 30);
        assert_eq!(out.get_pixel(50, 5)[0], 0);
    }

    #[test]
    fn small_holes_are_filled() {
        let mut mask = rect_mask(60, 60, 10, 10, 50, 50);
        for (x, y) in [(30, 30), (31, 30), (14, 45)] {
            mask.put_pixel(x, y, Luma([0]));
        }
        let params = MorphologyParams {
            open: false,
            ..MorphologyParams::default()
        };
        assert_eq!(denoise(&mask, &params), rect_mask(60, 60, 10, 10, 50, 50));
    }

    #[test]
    fn open_then_close_fills_an_interior_hole() {
        let mut mask = rect_mask(60, 60, 10, 10, 50, 50);
        mask.put_pixel(30, 30, Luma([0]));
        mask.put_pixel(31, 30, Luma([0]));
        let out = denoise(&mask, &MorphologyParams::default());
        assert_eq!(out.get_pixel(30, 30)[0], 255);
        assert_eq!(count_set(&out), 40 * 40);
    }

    #[test]
    fn denoising_is_idempotent() {
        // two blobs, speckles and a notch, all away from the border
        let mut mask = GrayImage::new(96, 96);
        for (x0, y0, x1, y1) in [(20, 20, 45, 40), (55, 50, 80, 78)] {
            for y in y0..y1 {
                for x in x0..x1 {
                    mask.put_pixel(x, y, Luma([255]));
                }
            }
        }
        for (x, y) in [(30, 60), (70, 25), (33, 30), (60, 60), (61, 60)] {
            let p = mask.get_pixel(x, y)[0];
            mask.put_pixel(x, y, Luma([255 - p]));
        }
        let params = MorphologyParams {
            radius: 2,
            ..MorphologyParams::default()
        };
        let once = denoise(&mask, &params);
        let twice = denoise(&once, &params);
        assert_eq!(once, twice);
    }

    #[test]
    fn disabled_and_empty_pass_through() {
        let mask = rect_mask(10, 10, 0, 0, 1, 1);
        assert_eq!(denoise(&mask, &MorphologyParams::disabled()), mask);
        let empty = GrayImage::new(0, 0);
        let denoised = denoise(&empty, &MorphologyParams::default());
        assert_eq!(denoised.dimensions(), (0, 0));
    }
}
