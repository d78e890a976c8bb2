use crate::contour::Contour;
use crate::geometry::{
    approximate_polygon, bounding_rect, min_enclosing_circle, perimeter, polygon_area,
    BoundingRect, EnclosingCircle,
};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeParams {
    /// Contours enclosing this many square pixels or fewer are dropped.
    pub min_area: f64,
    /// Douglas–Peucker tolerance as a fraction of the contour perimeter.
    pub epsilon_frac: f64,
}

impl Default for ShapeParams {
    fn default() -> Self {
        Self {
            min_area: 300.0,
            epsilon_frac: 0.04,
        }
    }
}

/// Measurements of one detected blob.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShapeDetection {
    pub area: f64,
    pub perimeter: f64,
    pub bounds: BoundingRect,
    pub circle: EnclosingCircle,
    /// Simplified outline.
    pub polygon: Vec<Point2<i32>>,
}

impl ShapeDetection {
    /// Object center used for tracking: the enclosing circle's center pixel.
    pub fn center(&self) -> Point2<i32> {
        self.circle.center_pixel()
    }

    /// Vertex count of the simplified outline.
    pub fn vertices(&self) -> usize {
        self.polygon.len()
    }
}

/// Measure a single contour; `None` when it has no points.
pub fn measure(contour: &Contour, params: &ShapeParams) -> Option<ShapeDetection> {
    let bounds = bounding_rect(&contour.points)?;
    let circle = min_enclosing_circle(&contour.points)?;
    Some(ShapeDetection {
        area: polygon_area(&contour.points),
        perimeter: perimeter(&contour.points),
        bounds,
        circle,
        polygon: approximate_polygon(&contour.points, params.epsilon_frac),
    })
}

/// Measure every contour with area above `params.min_area`, largest first.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(contours, params),
        fields(contours = contours.len())
    )
)]
pub fn analyze_contours(contours: &[Contour], params: &ShapeParams) -> Vec<ShapeDetection> {
    let mut detections: Vec<ShapeDetection> = contours
        .iter()
        .filter(|c| polygon_area(&c.points) > params.min_area)
        .filter_map(|c| measure(c, params))
        .collect();
    detections.sort_by(|a, b| b.area.total_cmp(&a.area));
    debug!(
        "{} of {} contours above min_area {}",
        detections.len(),
        contours.len(),
        params.min_area
    );
    detections
}

/// Detection with the largest area.
pub fn largest(detections: &[ShapeDetection]) -> Option<&ShapeDetection> {
    detections.iter().max_by(|a, b| a.area.total_cmp(&b.area))
}
