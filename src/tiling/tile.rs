use std::f64::consts::{FRAC_PI_2, TAU};

use tracing::warn;

use crate::error::{GeometryError, OperationError, Result};
use crate::math::geo_2d::{dist, dist_to_segment, is_ccw, midpoint, point_in_polygon, polygon_bounds, signed_area};
use crate::math::transform_2d::{is_reflection, transform_point};
use crate::math::{ArcData, Point2, Tolerances, Transform2, Vector2, TOLERANCE};
use crate::topology::{EdgeCurve, Map};

/// One side of a tile outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileEdge {
    pub start: Point2,
    pub end: Point2,
    pub curve: EdgeCurve,
}

impl TileEdge {
    #[must_use]
    pub fn arc_data(&self, tol: &Tolerances) -> Option<ArcData> {
        match self.curve {
            EdgeCurve::Line => None,
            EdgeCurve::Arc { center, convex } => Some(ArcData::new(self.start, self.end, center, convex, tol)),
        }
    }

    /// Point halfway along the side.
    #[must_use]
    pub fn mid_point(&self, tol: &Tolerances) -> Point2 {
        self.arc_data(tol)
            .map_or_else(|| midpoint(&self.start, &self.end), |arc| arc.mid_point())
    }

    /// Unit direction of the chord `start → end`; zero for a collapsed side.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        (self.end - self.start).try_normalize(0.0).unwrap_or_else(Vector2::zeros)
    }

    /// Distance from `p` to the side.
    #[must_use]
    pub fn distance_to(&self, p: &Point2, tol: &Tolerances) -> f64 {
        match self.arc_data(tol) {
            None => dist_to_segment(p, &self.start, &self.end),
            Some(arc) if arc.point_within_arc(p) => (dist(p, &arc.center()) - arc.radius()).abs(),
            Some(_) => dist(p, &self.start).min(dist(p, &self.end)),
        }
    }

    /// Fraction of the chord at which `p` projects, used to order points
    /// along the side.
    #[must_use]
    pub fn parameter_of(&self, p: &Point2) -> f64 {
        let d = self.end - self.start;
        let len_sq = d.norm_squared();
        if len_sq == 0.0 {
            return 0.0;
        }
        (p - self.start).dot(&d) / len_sq
    }
}

/// Closed outline of one tile shape in tile-local coordinates.
///
/// Sides run counter-clockwise; a clockwise polygon is reversed on
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    edges: Vec<TileEdge>,
}

impl Tile {
    /// Creates a straight-sided tile from its corners.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for fewer than three corners,
    /// non-finite corners, or a polygon without area, and
    /// `GeometryError::ZeroVector` when two consecutive corners coincide.
    pub fn polygon(mut corners: Vec<Point2>) -> Result<Self> {
        if corners.len() < 3 {
            return Err(OperationError::InvalidInput(format!("tile needs 3 corners, got {}", corners.len())).into());
        }
        if corners.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(OperationError::InvalidInput("non-finite tile corner".into()).into());
        }
        if signed_area(&corners).abs() < TOLERANCE {
            return Err(OperationError::InvalidInput("tile has no area".into()).into());
        }
        let n = corners.len();
        if (0..n).any(|i| dist(&corners[i], &corners[(i + 1) % n]) < TOLERANCE) {
            return Err(GeometryError::ZeroVector.into());
        }
        if !is_ccw(&corners) {
            corners.reverse();
        }
        let edges = (0..n)
            .map(|i| TileEdge {
                start: corners[i],
                end: corners[(i + 1) % n],
                curve: EdgeCurve::Line,
            })
            .collect();
        Ok(Self { edges })
    }

    /// Regular `n`-gon with unit circumradius centred on the origin, with a
    /// flat bottom side.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` when `n < 3`.
    pub fn regular(n: usize) -> Result<Self> {
        if n < 3 {
            return Err(OperationError::InvalidInput(format!("regular tile needs 3 sides, got {n}")).into());
        }
        #[allow(clippy::cast_precision_loss)]
        let step = TAU / n as f64;
        let offset = -FRAC_PI_2 - step / 2.0;
        #[allow(clippy::cast_precision_loss)]
        let corners = (0..n)
            .map(|k| {
                let (s, c) = (offset + step * k as f64).sin_cos();
                Point2::new(c, s)
            })
            .collect();
        Self::polygon(corners)
    }

    /// Replaces side `edge` by an arc around `center`. An out-of-range index
    /// is logged and ignored.
    #[must_use]
    pub fn with_arc(mut self, edge: usize, center: Point2, convex: bool) -> Self {
        match self.edges.get_mut(edge) {
            Some(side) => side.curve = EdgeCurve::Arc { center, convex },
            None => warn!(edge, sides = self.edges.len(), "no such tile side"),
        }
        self
    }

    #[must_use]
    pub fn edges(&self) -> &[TileEdge] {
        &self.edges
    }

    #[must_use]
    pub fn num_sides(&self) -> usize {
        self.edges.len()
    }

    /// Corner points in counter-clockwise order.
    #[must_use]
    pub fn corners(&self) -> Vec<Point2> {
        self.edges.iter().map(|e| e.start).collect()
    }

    /// Mid-point of every side, in side order.
    #[must_use]
    pub fn mid_points(&self, tol: &Tolerances) -> Vec<Point2> {
        self.edges.iter().map(|e| e.mid_point(tol)).collect()
    }

    /// Bounds of the corners and side mid-points.
    #[must_use]
    pub fn bounds(&self, tol: &Tolerances) -> Option<(Point2, Point2)> {
        let mut points = self.corners();
        points.extend(self.mid_points(tol));
        polygon_bounds(&points)
    }

    /// The outline as a map.
    #[must_use]
    pub fn boundary_map(&self, tol: Tolerances) -> Map {
        let mut map = Map::new(tol);
        for side in &self.edges {
            let inserted = match side.curve {
                EdgeCurve::Line => map.insert_line(side.start, side.end),
                EdgeCurve::Arc { center, convex } => map.insert_arc(side.start, side.end, center, convex),
            };
            if let Err(e) = inserted {
                warn!("skipping tile side: {e}");
            }
        }
        map
    }

    /// Distance from `p` to the nearest side.
    #[must_use]
    pub fn dist_to_boundary(&self, p: &Point2, tol: &Tolerances) -> f64 {
        self.edges
            .iter()
            .map(|e| e.distance_to(p, tol))
            .fold(f64::INFINITY, f64::min)
    }

    /// Even-odd containment against the corner polygon. Arc sides are taken
    /// as their chords.
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        point_in_polygon(p, &self.corners())
    }

    /// Unit normal of side `edge` pointing into the tile.
    #[must_use]
    pub fn inward_normal(&self, edge: usize) -> Option<Vector2> {
        let d = self.edges.get(edge)?.direction();
        Some(Vector2::new(-d.y, d.x))
    }

    /// The tile as seen through a placement. Sides stay counter-clockwise
    /// under reflections.
    #[must_use]
    pub fn transformed(&self, matrix: &Transform2) -> Self {
        let flip = is_reflection(matrix);
        let mut edges: Vec<TileEdge> = self
            .edges
            .iter()
            .map(|e| TileEdge {
                start: transform_point(matrix, &e.start),
                end: transform_point(matrix, &e.end),
                curve: match e.curve {
                    EdgeCurve::Line => EdgeCurve::Line,
                    EdgeCurve::Arc { center, convex } => EdgeCurve::Arc {
                        center: transform_point(matrix, &center),
                        convex: convex ^ flip,
                    },
                },
            })
            .collect();
        if flip {
            edges.reverse();
            for e in &mut edges {
                std::mem::swap(&mut e.start, &mut e.end);
                e.curve = e.curve.reversed();
            }
        }
        Self { edges }
    }
}
