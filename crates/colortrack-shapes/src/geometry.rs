//! Measurements on closed integer polygons (contours).

use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point;
use nalgebra::{Point2, Vector2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Axis-aligned box; `width`/`height` count pixels, so a single point has
/// size 1x1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingRect {
    pub fn right(&self) -> i32 {
        self.x + self.width as i32 - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32 - 1
    }

    pub fn contains(&self, p: Point2<i32>) -> bool {
        (self.x..=self.right()).contains(&p.x) && (self.y..=self.bottom()).contains(&p.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnclosingCircle {
    pub center: Point2<f32>,
    pub radius: f32,
}

impl EnclosingCircle {
    /// Pixel holding the center (coordinates truncated).
    pub fn center_pixel(&self) -> Point2<i32> {
        Point2::new(self.center.x as i32, self.center.y as i32)
    }
}

/// Enclosed area (shoelace formula) of the closed polygon.
pub fn polygon_area(points: &[Point2<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();
    twice.abs() as f64 * 0.5
}

/// Length of the closed polygon, including the closing edge.
pub fn perimeter(points: &[Point2<i32>]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    arc_length(&to_imageproc(points), true)
}

pub fn bounding_rect(points: &[Point2<i32>]) -> Option<BoundingRect> {
    let first = points.first()?;
    let (mut min, mut max) = (*first, *first);
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some(BoundingRect {
        x: min.x,
        y: min.y,
        width: (max.x - min.x) as u32 + 1,
        height: (max.y - min.y) as u32 + 1,
    })
}

/// Douglas–Peucker simplification of a closed polygon with tolerance
/// `epsilon_frac * perimeter`.
///
/// Polygons with fewer than three vertices, or a non-positive tolerance,
/// come back unchanged.
pub fn approximate_polygon(points: &[Point2<i32>], epsilon_frac: f64) -> Vec<Point2<i32>> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let curve = to_imageproc(points);
    let epsilon = epsilon_frac * arc_length(&curve, true);
    if epsilon.is_nan() || epsilon <= 0.0 {
        return points.to_vec();
    }
    let mut approx: Vec<Point2<i32>> = approximate_polygon_dp(&curve, epsilon, true)
        .into_iter()
        .map(|p| Point2::new(p.x, p.y))
        .collect();
    // closing vertex is implicit
    if approx.len() > 1 && approx.first() == approx.last() {
        approx.pop();
    }
    approx
}

const WELZL_SEED: u64 = 0x00c0_1017;

/// Smallest circle containing every point (Welzl, expected linear time).
///
/// Points are shuffled with a fixed seed, so the result is deterministic.
pub fn min_enclosing_circle(points: &[Point2<i32>]) -> Option<EnclosingCircle> {
    let mut pts: Vec<Point2<f64>> = points.iter().map(|p| p.cast::<f64>()).collect();
    pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    pts.dedup();
    pts.shuffle(&mut StdRng::seed_from_u64(WELZL_SEED));

    let mut circle = Circle::point(*pts.first()?);
    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle::point(pts[i]);
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::diameter(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = Circle::through(pts[i], pts[j], pts[k]);
                }
            }
        }
    }
    Some(EnclosingCircle {
        center: circle.center.cast::<f32>(),
        radius: circle.radius as f32,
    })
}

#[derive(Clone, Copy, Debug)]
struct Circle {
    center: Point2<f64>,
    radius: f64,
}

impl Circle {
    fn point(p: Point2<f64>) -> Self {
        Self {
            center: p,
            radius: 0.0,
        }
    }

    fn diameter(a: Point2<f64>, b: Point2<f64>) -> Self {
        Self {
            center: nalgebra::center(&a, &b),
            radius: (a - b).norm() * 0.5,
        }
    }

    /// Circumcircle; for (near-)collinear points, the circle on the
    /// farthest pair.
    fn through(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> Self {
        let ab: Vector2<f64> = b - a;
        let ac: Vector2<f64> = c - a;
        let d = 2.0 * (ab.x * ac.y - ab.y * ac.x);
        if d.abs() < 1e-12 {
            return [
                Self::diameter(a, b),
                Self::diameter(a, c),
                Self::diameter(b, c),
            ]
            .into_iter()
            .max_by(|x, y| x.radius.total_cmp(&y.radius))
            .unwrap_or_else(|| Self::point(a));
        }
        let (ab2, ac2) = (ab.norm_squared(), ac.norm_squared());
        let offset = Vector2::new(ac.y * ab2 - ab.y * ac2, ab.x * ac2 - ac.x * ab2) / d;
        Self {
            center: a + offset,
            radius: offset.norm(),
        }
    }

    fn contains(&self, p: Point2<f64>) -> bool {
        (p - self.center).norm() <= self.radius + 1e-7 * (1.0 + self.radius)
    }
}

fn to_imageproc(points: &[Point2<i32>]) -> Vec<Point<i32>> {
    points.iter().map(|p| Point::new(p.x, p.y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pts(coords: &[(i32, i32)]) -> Vec<Point2<i32>> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    #[test]
    fn shoelace_area_ignores_orientation() {
        let square = pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_relative_eq!(polygon_area(&square), 100.0);
        let mut reversed = square.clone();
        reversed.reverse();
        assert_relative_eq!(polygon_area(&reversed), 100.0);

        let triangle = pts(&[(0, 0), (4, 0), (0, 3)]);
        assert_relative_eq!(polygon_area(&triangle), 6.0);
        assert_eq!(polygon_area(&pts(&[(1, 1), (5, 5)])), 0.0);
    }

    #[test]
    fn perimeter_closes_polygon() {
        let square = pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        assert_relative_eq!(perimeter(&square), 40.0, epsilon = 1e-9);
        assert_eq!(perimeter(&pts(&[(3, 3)])), 0.0);
    }

    #[test]
    fn bounding_rect_is_inclusive() {
        let rect = bounding_rect(&pts(&[(3, 4), (7, 4), (7, 9), (3, 9)])).expect("rect");
        assert_eq!(
            rect,
            BoundingRect {
                x: 3,
                y: 4,
                width: 5,
                height: 6
            }
        );
        assert_eq!((rect.right(), rect.bottom()), (7, 9));
        assert!(rect.contains(Point2::new(7, 9)));
        assert!(!rect.contains(Point2::new(8, 9)));

        let single = bounding_rect(&pts(&[(2, 2)])).expect("rect");
        assert_eq!((single.width, single.height), (1, 1));
        assert!(bounding_rect(&[]).is_none());
    }

    #[test]
    fn enclosing_circle_of_square() {
        let square = pts(&[(0, 0), (10, 0), (10, 10), (0, 10), (5, 5), (2, 7)]);
        let circle = min_enclosing_circle(&square).expect("circle");
        assert_relative_eq!(circle.center.x, 5.0, epsilon = 1e-4);
        assert_relative_eq!(circle.center.y, 5.0, epsilon = 1e-4);
        assert_relative_eq!(circle.radius, 50f32.sqrt(), epsilon = 1e-4);
        assert_eq!(circle.center_pixel(), Point2::new(5, 5));
    }

    #[test]
    fn enclosing_circle_degenerate_inputs() {
        assert!(min_enclosing_circle(&[]).is_none());

        let one = min_enclosing_circle(&pts(&[(4, 6)])).expect("circle");
        assert_eq!(one.center, Point2::new(4.0, 6.0));
        assert_eq!(one.radius, 0.0);

        let line = min_enclosing_circle(&pts(&[(0, 0), (3, 0), (8, 0), (5, 0)])).expect("circle");
        assert_relative_eq!(line.center.x, 4.0, epsilon = 1e-5);
        assert_relative_eq!(line.center.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(line.radius, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn enclosing_circle_of_triangle_uses_circumcircle() {
        // acute triangle: circumcircle is minimal
        let tri = pts(&[(0, 0), (6, 0), (3, 5)]);
        let circle = min_enclosing_circle(&tri).expect("circle");
        for p in &tri {
            let d = (p.cast::<f32>() - circle.center).norm();
            assert_relative_eq!(d, circle.radius, epsilon = 1e-4);
        }
    }

    #[test]
    fn enclosing_circle_covers_every_point() {
        let cloud: Vec<Point2<i32>> = (0..200)
            .map(|i| Point2::new((i * 37) % 91 - 40, (i * 53) % 67 - 20))
            .collect();
        let circle = min_enclosing_circle(&cloud).expect("circle");
        for p in &cloud {
            let d = (p.cast::<f32>() - circle.center).norm();
            assert!(d <= circle.radius + 1e-3, "{p:?} at {d}");
        }
    }

    #[test]
    fn approximation_reduces_dense_square() {
        let mut square = Vec::new();
        for x in 0..20 {
            square.push(Point2::new(x, 0));
        }
        for y in 0..20 {
            square.push(Point2::new(20, y));
        }
        for x in (1..=20).rev() {
            square.push(Point2::new(x, 20));
        }
        for y in (1..=20).rev() {
            square.push(Point2::new(0, y));
        }
        let approx = approximate_polygon(&square, 0.04);
        assert_eq!(approx.len(), 4, "got {approx:?}");
        for (x, y) in [(0, 0), (20, 0), (20, 20), (0, 20)] {
            assert!(approx.contains(&Point2::new(x, y)), "missing ({x}, {y})");
        }
    }

    #[test]
    fn approximation_passes_small_inputs_through() {
        let two = pts(&[(0, 0), (5, 5)]);
        assert_eq!(approximate_polygon(&two, 0.04), two);
        let tri = pts(&[(0, 0), (5, 0), (0, 5)]);
        assert_eq!(approximate_polygon(&tri, 0.0), tri);
    }
}
