//! Shape analysis on binary masks.
//!
//! - [`ContourExtractor`] turns a mask into outer contours,
//! - [`analyze_contours`] measures them (area, bounds, enclosing circle,
//!   polygon approximation) and drops small blobs,
//! - [`Trail`] keeps the recent object centers for drawing a motion path.
//!
//! Coordinates are pixel indices: `x` to the right, `y` down.

mod contour;
mod detection;
mod geometry;
mod trail;

pub use contour::{Contour, ContourExtractor, ImageprocContourExtractor};
pub use detection::{analyze_contours, largest, measure, ShapeDetection, ShapeParams};
pub use geometry::{
    approximate_polygon, bounding_rect, min_enclosing_circle, perimeter, polygon_area,
    BoundingRect, EnclosingCircle,
};
pub use trail::{Trail, DEFAULT_TRAIL_LEN};

pub use nalgebra::Point2;
