//! Geometry and collision primitives
//!
//! Straight-line geometry for the race: segment crossing (checkpoint
//! detection), convex containment, and the car's rotated bounding box.
//! Degenerate inputs resolve to "no hit" rather than errors.

use serde::{Deserialize, Serialize};

use super::vector::{Vec2, cross, rotate};
use crate::consts::PARALLEL_EPSILON;

/// A straight line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub start: Vec2,
    pub end: Vec2,
}

impl LineSegment {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Direction vector from start to end (not normalized)
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    #[inline]
    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }
}

/// Intersection point of two segments, if they cross
///
/// Solves `a.start + t·r = b.start + u·s` for t and u. Segments whose
/// direction cross product is below [`PARALLEL_EPSILON`] are treated as
/// parallel and never intersect, even when collinear and overlapping.
/// Touching endpoints count as a hit.
pub fn segment_intersection(a: &LineSegment, b: &LineSegment) -> Option<Vec2> {
    let r = a.direction();
    let s = b.direction();
    let denom = cross(r, s);

    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }

    let qp = b.start - a.start;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a.start + r * t)
    } else {
        None
    }
}

/// Whether `point` lies inside a convex polygon
///
/// Every edge's cross product with the point must share a sign (points on an
/// edge count as inside). Fewer than 3 vertices is never inside. Concave
/// polygons are not supported.
pub fn point_in_convex_polygon(point: Vec2, vertices: &[Vec2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut positive = false;
    let mut negative = false;

    for (i, &a) in vertices.iter().enumerate() {
        let b = vertices[(i + 1) % vertices.len()];
        let c = cross(b - a, point - a);
        if c > 0.0 {
            positive = true;
        } else if c < 0.0 {
            negative = true;
        }
        if positive && negative {
            return false;
        }
    }

    true
}

/// World-space corners of a rectangle rotated about its center
///
/// Corners are returned in counter-clockwise order starting from the local
/// (-x, -y) corner.
pub fn rect_corners(center: Vec2, half_extents: Vec2, rotation: f64) -> [Vec2; 4] {
    let (hx, hy) = (half_extents.x, half_extents.y);
    [
        Vec2::new(-hx, -hy),
        Vec2::new(hx, -hy),
        Vec2::new(hx, hy),
        Vec2::new(-hx, hy),
    ]
    .map(|local| center + rotate(local, rotation))
}

/// Whether a segment touches a rectangle given by its four corners
///
/// True when the segment crosses any rectangle edge, or when the segment's
/// start point is inside the rectangle. The end point is never tested for
/// containment.
pub fn rect_segment_intersects(corners: &[Vec2; 4], segment: &LineSegment) -> bool {
    let crosses_edge = (0..4).any(|i| {
        let edge = LineSegment::new(corners[i], corners[(i + 1) % 4]);
        segment_intersection(&edge, segment).is_some()
    });

    crosses_edge || point_in_convex_polygon(segment.start, corners)
}

/// Point on `segment` closest to `point`
pub fn closest_point_on_segment(point: Vec2, segment: &LineSegment) -> Vec2 {
    let line_vec = segment.direction();
    let len_sq = line_vec.length_squared();

    if len_sq == 0.0 {
        return segment.start;
    }

    let t = ((point - segment.start).dot(line_vec) / len_sq).clamp(0.0, 1.0);
    segment.start + line_vec * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::vector::{EPSILON, approx_eq};
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegment {
        LineSegment::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
    }

    #[test]
    fn test_segment_intersection_cross() {
        let a = seg(0.0, 0.0, 10.0, 10.0);
        let b = seg(0.0, 10.0, 10.0, 0.0);
        let hit = segment_intersection(&a, &b).expect("segments cross");
        assert!(approx_eq(hit, Vec2::new(5.0, 5.0), EPSILON));
    }

    #[test]
    fn test_segment_intersection_miss() {
        let a = seg(0.0, 0.0, 1.0, 1.0);
        let b = seg(5.0, 0.0, 6.0, -3.0);
        assert!(segment_intersection(&a, &b).is_none());
    }

    #[test]
    fn test_segment_intersection_touching_endpoint() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(10.0, -5.0, 10.0, 5.0);
        let hit = segment_intersection(&a, &b).expect("endpoint touch counts");
        assert!(approx_eq(hit, Vec2::new(10.0, 0.0), EPSILON));
    }

    #[test]
    fn test_collinear_overlap_is_parallel() {
        let a = seg(0.0, 0.0, 10.0, 0.0);
        let b = seg(5.0, 0.0, 15.0, 0.0);
        assert!(segment_intersection(&a, &b).is_none());
    }

    #[test]
    fn test_point_in_convex_polygon() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_convex_polygon(Vec2::new(5.0, 5.0), &square));
        assert!(!point_in_convex_polygon(Vec2::new(15.0, 5.0), &square));
        // Winding order does not matter
        let mut reversed = square;
        reversed.reverse();
        assert!(point_in_convex_polygon(Vec2::new(5.0, 5.0), &reversed));
    }

    #[test]
    fn test_degenerate_polygon_is_never_inside() {
        assert!(!point_in_convex_polygon(Vec2::ZERO, &[]));
        assert!(!point_in_convex_polygon(
            Vec2::ZERO,
            &[Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0)]
        ));
    }

    #[test]
    fn test_rect_corners_rotated() {
        let corners = rect_corners(Vec2::new(10.0, 10.0), Vec2::new(2.0, 1.0), FRAC_PI_2);
        // Local (-2, -1) rotated 90° CCW is (1, -2)
        assert!(approx_eq(corners[0], Vec2::new(11.0, 8.0), EPSILON));
        assert!(approx_eq(corners[2], Vec2::new(9.0, 12.0), EPSILON));
    }

    #[test]
    fn test_rect_segment_crossing_edge() {
        let corners = rect_corners(Vec2::ZERO, Vec2::new(5.0, 5.0), 0.0);
        assert!(rect_segment_intersects(&corners, &seg(-10.0, 0.0, 10.0, 0.0)));
        assert!(!rect_segment_intersects(&corners, &seg(-10.0, 8.0, 10.0, 8.0)));
    }

    #[test]
    fn test_rect_segment_fully_inside_uses_start_point() {
        let corners = rect_corners(Vec2::ZERO, Vec2::new(5.0, 5.0), 0.0);
        // No edge is crossed; the inside start point alone reports the hit
        assert!(rect_segment_intersects(&corners, &seg(-1.0, 0.0, 1.0, 0.0)));
        // Entering from outside is caught by the edge crossing instead
        assert!(rect_segment_intersects(&corners, &seg(20.0, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_closest_point_on_segment() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        assert!(approx_eq(
            closest_point_on_segment(Vec2::new(4.0, 3.0), &s),
            Vec2::new(4.0, 0.0),
            EPSILON
        ));
        assert_eq!(closest_point_on_segment(Vec2::new(-5.0, 1.0), &s), s.start);
        assert_eq!(closest_point_on_segment(Vec2::new(50.0, 1.0), &s), s.end);

        let point = seg(3.0, 3.0, 3.0, 3.0);
        assert_eq!(closest_point_on_segment(Vec2::new(0.0, 0.0), &point), point.start);
    }

    fn coord() -> impl Strategy<Value = f64> {
        -100.0..100.0f64
    }

    proptest! {
        #[test]
        fn prop_intersection_symmetric(
            ax in coord(), ay in coord(), bx in coord(), by in coord(),
            cx in coord(), cy in coord(), dx in coord(), dy in coord(),
        ) {
            let a = seg(ax, ay, bx, by);
            let b = seg(cx, cy, dx, dy);
            // Near-parallel pairs amplify rounding in the hit point
            let r = a.direction();
            let s = b.direction();
            prop_assume!(cross(r, s).abs() > 1e-3 * r.length() * s.length());

            match (segment_intersection(&a, &b), segment_intersection(&b, &a)) {
                (Some(p), Some(q)) => prop_assert!(approx_eq(p, q, 1e-6)),
                (None, None) => {}
                (p, q) => prop_assert!(false, "asymmetric result {p:?} vs {q:?}"),
            }
        }

        #[test]
        fn prop_closest_point_is_on_segment(
            ax in coord(), ay in coord(), bx in coord(), by in coord(),
            px in coord(), py in coord(),
        ) {
            let s = seg(ax, ay, bx, by);
            let p = Vec2::new(px, py);
            let c = closest_point_on_segment(p, &s);
            // No endpoint is closer than the returned point
            let d = (p - c).length();
            prop_assert!(d <= (p - s.start).length() + 1e-9);
            prop_assert!(d <= (p - s.end).length() + 1e-9);
        }
    }
}
