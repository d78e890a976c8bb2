use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Closed boundary of one connected foreground blob, in tracing order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point2<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point2<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Finds the outer contours of the foreground (non-zero) regions of a mask.
pub trait ContourExtractor {
    fn extract(&self, mask: &GrayImage) -> Vec<Contour>;
}

/// Border following (Suzuki–Abe) from `imageproc`, outer borders only.
///
/// Hole borders are dropped, so a ring yields one contour, not two.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageprocContourExtractor;

impl ContourExtractor for ImageprocContourExtractor {
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "debug",
            skip(self, mask),
            fields(width = mask.width(), height = mask.height())
        )
    )]
    fn extract(&self, mask: &GrayImage) -> Vec<Contour> {
        if mask.width() == 0 || mask.height() == 0 {
            return Vec::new();
        }
        find_contours::<i32>(mask)
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer)
            .map(to_contour)
            .collect()
    }
}

fn to_contour(c: imageproc::contours::Contour<i32>) -> Contour {
    let points = c.points.into_iter().map(|p| Point2::new(p.x, p.y));
    Contour::new(points.collect())
}
