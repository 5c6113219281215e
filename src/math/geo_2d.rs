use std::f64::consts::TAU;

use super::{Point2, Vector2, TOLERANCE};

/// Euclidean distance between two points.
#[must_use]
pub fn dist(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm()
}

/// Squared Euclidean distance between two points.
#[must_use]
pub fn dist2(a: &Point2, b: &Point2) -> f64 {
    (b - a).norm_squared()
}

/// Angle of a vector in radians, in `(-π, π]`.
#[must_use]
pub fn angle_of(v: &Vector2) -> f64 {
    v.y.atan2(v.x)
}

/// Wraps an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point2, b: &Point2) -> Point2 {
    Point2::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5)
}

/// Returns the left-pointing normal of a vector.
#[must_use]
pub fn left_normal(v: &Vector2) -> Vector2 {
    Vector2::new(-v.y, v.x)
}

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Reflects `p` across the infinite line through `a` and `b`.
///
/// A degenerate line (`a == b`) reflects through the point `a`.
#[must_use]
pub fn reflect_point(p: &Point2, a: &Point2, b: &Point2) -> Point2 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return Point2::from(a.coords * 2.0 - p.coords);
    }
    let t = (p - a).dot(&d) / len_sq;
    let foot = a + d * t;
    Point2::from(foot.coords * 2.0 - p.coords)
}

/// Intersections of the infinite line through `p0`, `p1` with a circle.
///
/// Returns zero, one (tangent) or two points, ordered along `p0 → p1`.
#[must_use]
pub fn line_circle_intersect(p0: &Point2, p1: &Point2, center: &Point2, radius: f64) -> Vec<Point2> {
    let d = p1 - p0;
    let a = d.norm_squared();
    if a < TOLERANCE * TOLERANCE || radius < TOLERANCE {
        return Vec::new();
    }

    // (p0 + t*d - c)² = r²
    let f = p0 - center;
    let b = 2.0 * f.dot(&d);
    let c = f.norm_squared() - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    let scale = radius * radius * a;
    if discriminant < -TOLERANCE * scale {
        return Vec::new();
    }
    let disc_sqrt = discriminant.max(0.0).sqrt();
    if disc_sqrt <= TOLERANCE * scale.sqrt() {
        let t = -b / (2.0 * a);
        return vec![p0 + d * t];
    }

    let t0 = (-b - disc_sqrt) / (2.0 * a);
    let t1 = (-b + disc_sqrt) / (2.0 * a);
    vec![p0 + d * t0, p0 + d * t1]
}

/// Intersections of two circles.
///
/// Concentric circles yield no points even when coincident.
#[must_use]
pub fn circle_circle_intersect(c1: &Point2, r1: f64, c2: &Point2, r2: f64) -> Vec<Point2> {
    if r1 < TOLERANCE || r2 < TOLERANCE {
        return Vec::new();
    }
    let delta = c2 - c1;
    let dist_sq = delta.norm_squared();
    let d = dist_sq.sqrt();
    if d < TOLERANCE {
        return Vec::new();
    }

    let eps = TOLERANCE * (r1 + r2).max(1.0);
    if d > r1 + r2 + eps || d < (r1 - r2).abs() - eps {
        return Vec::new();
    }

    // Distance from c1 to the radical line along c1→c2.
    let a = (r1 * r1 - r2 * r2 + dist_sq) / (2.0 * d);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let dir = delta / d;
    let mid = c1 + dir * a;

    if h < eps {
        return vec![mid];
    }
    let perp = left_normal(&dir);
    vec![mid + perp * h, mid - perp * h]
}

/// Signed area of a closed polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Returns `true` when the polygon winds counter-clockwise.
#[must_use]
pub fn is_ccw(points: &[Point2]) -> bool {
    signed_area(points) > 0.0
}

/// Average of the polygon's vertices.
#[must_use]
pub fn centroid(points: &[Point2]) -> Option<Point2> {
    if points.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let sum = points.iter().fold(Vector2::zeros(), |acc, p| acc + p.coords);
    Some(Point2::from(sum / n))
}

/// Even-odd point-in-polygon test. Points exactly on the boundary may
/// report either side; combine with [`dist_to_polygon`] when that matters.
#[must_use]
pub fn point_in_polygon(p: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (&polygon[i], &polygon[j]);
        if (pi.y > p.y) != (pj.y > p.y) {
            let x_cross = pi.x + (p.y - pi.y) * (pj.x - pi.x) / (pj.y - pi.y);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Nearest point to `p` on the segment `a`–`b`.
#[must_use]
pub fn nearest_point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> Point2 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return *a;
    }
    let t = ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0);
    a + d * t
}

/// Distance from `p` to the segment `a`–`b`.
#[must_use]
pub fn dist_to_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    dist(p, &nearest_point_on_segment(p, a, b))
}

/// Distance from `p` to the closed polygon outline.
#[must_use]
pub fn dist_to_polygon(p: &Point2, polygon: &[Point2]) -> f64 {
    let n = polygon.len();
    (0..n)
        .map(|i| dist_to_segment(p, &polygon[i], &polygon[(i + 1) % n]))
        .fold(f64::INFINITY, f64::min)
}

/// Returns `true` when `p` lies within `tol` of the segment `a`–`b`.
#[must_use]
pub fn point_on_segment(p: &Point2, a: &Point2, b: &Point2, tol: f64) -> bool {
    dist_to_segment(p, a, b) < tol
}

/// Returns `true` when `c` lies within `tol` of the infinite line through
/// `a` and `b`. A degenerate line counts as colinear with everything.
#[must_use]
pub fn is_colinear(a: &Point2, b: &Point2, c: &Point2, tol: f64) -> bool {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return true;
    }
    (cross(&d, &(c - a)) / len).abs() < tol
}

/// Axis-aligned bounds of a point set as `(min, max)`.
#[must_use]
pub fn polygon_bounds(points: &[Point2]) -> Option<(Point2, Point2)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;

    use super::*;

    const TOL: f64 = 1e-10;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn unit_square() -> Vec<Point2> {
        vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]
    }

    #[test]
    fn distances() {
        assert_abs_diff_eq!(dist(&p(0.0, 0.0), &p(3.0, 4.0)), 5.0, epsilon = TOL);
        assert_abs_diff_eq!(dist2(&p(0.0, 0.0), &p(3.0, 4.0)), 25.0, epsilon = TOL);
    }

    #[test]
    fn angle_normalization_wraps_negative() {
        let a = normalize_angle(-PI / 2.0);
        assert_abs_diff_eq!(a, 1.5 * PI, epsilon = TOL);
        assert_abs_diff_eq!(normalize_angle(TAU), 0.0, epsilon = TOL);
        assert!(normalize_angle(-1e-300) < TAU);
    }

    #[test]
    fn reflection_across_diagonal() {
        let r = reflect_point(&p(1.0, 0.0), &p(0.0, 0.0), &p(1.0, 1.0));
        assert_abs_diff_eq!(r.x, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(r.y, 1.0, epsilon = TOL);
    }

    #[test]
    fn line_circle_secant_and_tangent() {
        let hits = line_circle_intersect(&p(-2.0, 0.0), &p(2.0, 0.0), &p(0.0, 0.0), 1.0);
        assert_eq!(hits.len(), 2);
        assert_abs_diff_eq!(hits[0].x, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hits[1].x, 1.0, epsilon = 1e-9);

        let tangent = line_circle_intersect(&p(-1.0, 1.0), &p(1.0, 1.0), &p(0.0, 0.0), 1.0);
        assert_eq!(tangent.len(), 1);
        assert_abs_diff_eq!(tangent[0].y, 1.0, epsilon = 1e-9);

        let miss = line_circle_intersect(&p(-1.0, 2.0), &p(1.0, 2.0), &p(0.0, 0.0), 1.0);
        assert!(miss.is_empty());
    }

    #[test]
    fn circle_circle_two_points() {
        let hits = circle_circle_intersect(&p(0.0, 0.0), 1.0, &p(1.0, 0.0), 1.0);
        assert_eq!(hits.len(), 2);
        for h in hits {
            assert_abs_diff_eq!(h.x, 0.5, epsilon = 1e-9);
            assert_abs_diff_eq!(h.y.abs(), 3.0_f64.sqrt() / 2.0, epsilon = 1e-9);
        }
        assert!(circle_circle_intersect(&p(0.0, 0.0), 1.0, &p(5.0, 0.0), 1.0).is_empty());
        assert_eq!(circle_circle_intersect(&p(0.0, 0.0), 1.0, &p(2.0, 0.0), 1.0).len(), 1);
    }

    #[test]
    fn polygon_area_and_orientation() {
        let sq = unit_square();
        assert_abs_diff_eq!(signed_area(&sq), 1.0, epsilon = TOL);
        assert!(is_ccw(&sq));
        let rev: Vec<_> = sq.iter().rev().copied().collect();
        assert_abs_diff_eq!(signed_area(&rev), -1.0, epsilon = TOL);
        assert!(!is_ccw(&rev));
        assert_abs_diff_eq!(signed_area(&sq[..2]), 0.0, epsilon = TOL);
    }

    #[test]
    fn point_in_square() {
        let sq = unit_square();
        assert!(point_in_polygon(&p(0.5, 0.5), &sq));
        assert!(!point_in_polygon(&p(1.5, 0.5), &sq));
        assert!(!point_in_polygon(&p(0.5, -0.1), &sq));
    }

    #[test]
    fn nearest_point_clamps_to_segment() {
        let n = nearest_point_on_segment(&p(-1.0, 1.0), &p(0.0, 0.0), &p(2.0, 0.0));
        assert_abs_diff_eq!(n.x, 0.0, epsilon = TOL);
        let n = nearest_point_on_segment(&p(1.0, 1.0), &p(0.0, 0.0), &p(2.0, 0.0));
        assert_abs_diff_eq!(n.x, 1.0, epsilon = TOL);
        assert_abs_diff_eq!(dist_to_segment(&p(1.0, 1.0), &p(0.0, 0.0), &p(2.0, 0.0)), 1.0, epsilon = TOL);
    }

    #[test]
    fn colinearity() {
        assert!(is_colinear(&p(0.0, 0.0), &p(1.0, 1.0), &p(3.0, 3.0), 1e-9));
        assert!(!is_colinear(&p(0.0, 0.0), &p(1.0, 1.0), &p(3.0, 3.1), 1e-9));
    }

    #[test]
    fn bounds_and_centroid() {
        let sq = unit_square();
        let (min, max) = polygon_bounds(&sq).unwrap();
        assert_abs_diff_eq!(min.x, 0.0, epsilon = TOL);
        assert_abs_diff_eq!(max.y, 1.0, epsilon = TOL);
        let c = centroid(&sq).unwrap();
        assert_abs_diff_eq!(c.x, 0.5, epsilon = TOL);
        assert!(polygon_bounds(&[]).is_none());
        assert!(dist_to_polygon(&p(0.5, 0.0), &sq) < TOL);
    }
}
