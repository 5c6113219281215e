//! Parametric segment-segment intersection.
//!
//! Segment `p0 → p1` is `p0 + s * (p1 - p0)`, segment `q0 → q1` is
//! `q0 + t * (q1 - q0)`.

use super::geo_2d::cross;
use super::{Point2, Tolerances};

/// Solves for the parametric fractions `(s, t)` at which the infinite lines
/// through the two segments meet.
///
/// Returns `None` when the determinant is within tolerance of zero
/// (parallel or degenerate segments).
#[must_use]
pub fn intersection_params(
    p0: &Point2,
    p1: &Point2,
    q0: &Point2,
    q1: &Point2,
    tol: &Tolerances,
) -> Option<(f64, f64)> {
    let d1 = p1 - p0;
    let d2 = q1 - q0;
    let det = cross(&d1, &d2);
    if det.abs() <= tol.parallel * d1.norm() * d2.norm() || det == 0.0 {
        return None;
    }
    let w = q0 - p0;
    let s = cross(&w, &d2) / det;
    let t = cross(&w, &d1) / det;
    Some((s, t))
}

/// Intersection point of the two infinite lines, if they are not parallel.
#[must_use]
pub fn line_intersection(
    p0: &Point2,
    p1: &Point2,
    q0: &Point2,
    q1: &Point2,
    tol: &Tolerances,
) -> Option<Point2> {
    let (s, _) = intersection_params(p0, p1, q0, q1, tol)?;
    Some(p0 + (p1 - p0) * s)
}

/// Intersection point of two segments, endpoints included with tolerance.
#[must_use]
pub fn intersection(
    p0: &Point2,
    p1: &Point2,
    q0: &Point2,
    q1: &Point2,
    tol: &Tolerances,
) -> Option<Point2> {
    let (s, t) = intersection_params(p0, p1, q0, q1, tol)?;
    let eps = tol.parameter;
    let within = |v: f64| v >= -eps && v <= 1.0 + eps;
    if !(within(s) && within(t)) {
        return None;
    }
    Some(p0 + (p1 - p0) * s.clamp(0.0, 1.0))
}

/// Like [`intersection`], but rejects a hit that coincides with an endpoint
/// of both segments at once. Such a hit is topology the two segments already
/// share, not a crossing.
#[must_use]
pub fn true_intersection(
    p0: &Point2,
    p1: &Point2,
    q0: &Point2,
    q1: &Point2,
    tol: &Tolerances,
) -> Option<Point2> {
    let (s, t) = intersection_params(p0, p1, q0, q1, tol)?;
    let eps = tol.parameter;
    let within = |v: f64| v >= -eps && v <= 1.0 + eps;
    if !(within(s) && within(t)) {
        return None;
    }
    let at_end = |v: f64| v.abs() <= eps || (v - 1.0).abs() <= eps;
    if at_end(s) && at_end(t) {
        return None;
    }
    Some(p0 + (p1 - p0) * s.clamp(0.0, 1.0))
}
