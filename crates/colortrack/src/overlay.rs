//! Annotate frames with the tracker output.

use crate::track::FrameResult;
use colortrack_shapes::{ShapeDetection, Trail};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Colors are RGB.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    pub box_color: [u8; 3],
    pub center_color: [u8; 3],
    pub polygon_color: [u8; 3],
    pub trail_color: [u8; 3],
    /// Line width in pixels for boxes, outlines and the trail.
    pub thickness: u32,
    pub center_radius: i32,
    pub draw_polygon: bool,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            box_color: [255, 0, 0],
            center_color: [255, 0, 0],
            polygon_color: [0, 255, 255],
            trail_color: [0, 255, 255],
            thickness: 2,
            center_radius: 5,
            draw_polygon: false,
        }
    }
}

/// Copy of `frame` with detections, centers and the trail drawn on top.
pub fn draw_overlay(
    frame: &RgbImage,
    result: &FrameResult,
    trail: &Trail,
    style: &OverlayStyle,
) -> RgbImage {
    let mut canvas = frame.clone();
    for det in &result.detections {
        if style.draw_polygon {
            draw_polygon(
                &mut canvas,
                &det.polygon,
                Rgb(style.polygon_color),
                style.thickness,
            );
        }
        draw_box(&mut canvas, det, Rgb(style.box_color), style.thickness);
        let c = det.center();
        draw_filled_circle_mut(
            &mut canvas,
            (c.x, c.y),
            style.center_radius,
            Rgb(style.center_color),
        );
    }
    for (a, b) in trail.segments() {
        draw_thick_segment(&mut canvas, a, b, Rgb(style.trail_color), style.thickness);
    }
    canvas
}

fn draw_box(canvas: &mut RgbImage, det: &ShapeDetection, color: Rgb<u8>, thickness: u32) {
    let b = det.bounds;
    // grows outwards so the blob itself stays visible
    for i in 0..thickness.max(1) {
        let rect =
            Rect::at(b.x - i as i32, b.y - i as i32).of_size(b.width + 2 * i, b.height + 2 * i);
        draw_hollow_rect_mut(canvas, rect, color);
    }
}

fn draw_polygon(canvas: &mut RgbImage, polygon: &[Point2<i32>], color: Rgb<u8>, thickness: u32) {
    if polygon.len() < 2 {
        return;
    }
    for (a, b) in polygon.iter().zip(polygon.iter().cycle().skip(1)) {
        draw_thick_segment(canvas, *a, *b, color, thickness);
    }
}

fn draw_thick_segment(
    canvas: &mut RgbImage,
    a: Point2<i32>,
    b: Point2<i32>,
    color: Rgb<u8>,
    thickness: u32,
) {
    if thickness <= 1 {
        let (start, end) = ((a.x as f32, a.y as f32), (b.x as f32, b.y as f32));
        draw_line_segment_mut(canvas, start, end, color);
        return;
    }
    let radius = (thickness / 2) as i32;
    let d = (b - a).cast::<f32>();
    let steps = d.norm().ceil().max(1.0) as i32;
    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let p = a.cast::<f32>() + d * t;
        let center = (p.x.round() as i32, p.y.round() as i32);
        draw_filled_circle_mut(canvas, center, radius, color);
    }
}
