//! Derived representation of a curved edge.
//!
//! Angle convention: radians in `[0, 2π)`, measured counter-clockwise from
//! the +x axis around the arc center.
//! - convex arcs sweep clockwise from start to end: `span <= 0`
//! - concave arcs sweep counter-clockwise: `span >= 0`
//!
//! The center of a convex arc lies right of the chord `start → end`, the
//! center of a concave arc lies left of it. Magnitude is the distance of the
//! center from the chord divided by the chord length, so `0` puts the center
//! on the chord midpoint (a half circle).

use std::f64::consts::TAU;

use tracing::warn;

use super::geo_2d::{angle_of, cross, dist, left_normal, midpoint, normalize_angle};
use super::{Point2, Tolerances, Vector2, TOLERANCE};

/// Angles, sweep and bulge of one arc, computed from chord + center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcData {
    start: Point2,
    end: Point2,
    center: Point2,
    convex: bool,
    start_angle: f64,
    end_angle: f64,
    span: f64,
    magnitude: f64,
    angle_tol: f64,
}

impl ArcData {
    /// Derives the arc running from `start` to `end` around `center`.
    #[must_use]
    pub fn new(start: Point2, end: Point2, center: Point2, convex: bool, tol: &Tolerances) -> Self {
        let mut arc = Self {
            start,
            end,
            center,
            convex,
            start_angle: 0.0,
            end_angle: 0.0,
            span: 0.0,
            magnitude: 0.0,
            angle_tol: tol.angle,
        };
        arc.derive();
        arc
    }

    fn derive(&mut self) {
        if self.convex {
            self.set_convex();
        } else {
            self.set_concave();
        }
        self.calc_magnitude();
    }

    fn calc_angles(&mut self) {
        self.start_angle = normalize_angle(angle_of(&(self.start - self.center)));
        self.end_angle = normalize_angle(angle_of(&(self.end - self.center)));
    }

    /// Marks the arc convex and recomputes a clockwise span.
    pub fn set_convex(&mut self) {
        self.convex = true;
        self.calc_angles();
        let mut span = self.end_angle - self.start_angle;
        if span > 0.0 {
            span -= TAU;
        }
        if span > 0.0 || span.is_nan() {
            warn!(span, "convex arc produced a non-clockwise span, flattening");
            span = 0.0;
        }
        self.span = span;
    }

    /// Marks the arc concave and recomputes a counter-clockwise span.
    pub fn set_concave(&mut self) {
        self.convex = false;
        self.calc_angles();
        let mut span = self.end_angle - self.start_angle;
        if span < 0.0 {
            span += TAU;
        }
        if span < 0.0 || span.is_nan() {
            warn!(span, "concave arc produced a clockwise span, flattening");
            span = 0.0;
        }
        self.span = span;
    }

    /// Recomputes the bulge ratio from the current center.
    ///
    /// A center on the wrong side of the chord for this convexity yields 0.
    pub fn calc_magnitude(&mut self) {
        let chord = self.end - self.start;
        let len = chord.norm();
        if len < TOLERANCE {
            self.magnitude = 0.0;
            return;
        }
        // Positive when the center is left of start → end.
        let signed = cross(&chord, &(self.center - self.start)) / len;
        let toward = if self.convex { -signed } else { signed };
        self.magnitude = (toward / len).clamp(0.0, 1.0);
    }

    /// Moves the center so the arc has the requested bulge ratio, then
    /// re-derives angles and span.
    pub fn set_arc_magnitude(&mut self, magnitude: f64) {
        let magnitude = magnitude.clamp(0.0, 1.0);
        let chord = self.end - self.start;
        let len = chord.norm();
        if len < TOLERANCE {
            warn!("cannot set magnitude of a zero-length arc chord");
            return;
        }
        let normal = left_normal(&(chord / len));
        let side = if self.convex { -1.0 } else { 1.0 };
        self.center = midpoint(&self.start, &self.end) + normal * (side * magnitude * len);
        self.derive();
    }

    /// Returns `true` when the angle from the center to `pt` lies within the
    /// swept range. Start and end angles (within tolerance) count as inside.
    #[must_use]
    pub fn point_within_arc(&self, pt: &Point2) -> bool {
        let v: Vector2 = pt - self.center;
        if v.norm() < TOLERANCE {
            return false;
        }
        let angle = normalize_angle(angle_of(&v));
        let delta = if self.convex {
            normalize_angle(self.start_angle - angle)
        } else {
            normalize_angle(angle - self.start_angle)
        };
        delta <= self.span.abs() + self.angle_tol || delta >= TAU - self.angle_tol
    }

    /// Point at fraction `t` of the sweep (`0` = start, `1` = end).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        let angle = self.start_angle + self.span * t;
        let r = self.radius();
        Point2::new(self.center.x + r * angle.cos(), self.center.y + r * angle.sin())
    }

    /// Point halfway along the sweep.
    #[must_use]
    pub fn mid_point(&self) -> Point2 {
        self.point_at(0.5)
    }

    /// Distance from the center to the start point.
    #[must_use]
    pub fn radius(&self) -> f64 {
        dist(&self.center, &self.start)
    }

    /// Length along the arc.
    #[must_use]
    pub fn arc_length(&self) -> f64 {
        self.radius() * self.span.abs()
    }

    /// Length of the chord.
    #[must_use]
    pub fn chord_length(&self) -> f64 {
        dist(&self.start, &self.end)
    }

    #[must_use]
    pub fn start(&self) -> Point2 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Point2 {
        self.end
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        self.center
    }

    #[must_use]
    pub fn convex(&self) -> bool {
        self.convex
    }

    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    #[must_use]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Signed sweep in radians.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.span
    }

    /// Bulge ratio in `[0, 1]`.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }
}
