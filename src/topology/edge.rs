use crate::math::Point2;

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in a map.
    pub struct EdgeId;
}

/// The shape of an edge between its two vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EdgeCurve {
    /// A straight segment.
    Line,
    /// A circular arc around `center`. Convexity is relative to the
    /// direction `v1 → v2` (see [`crate::math::ArcData`]).
    Arc { center: Point2, convex: bool },
}

impl EdgeCurve {
    /// Returns the same geometric curve described from the other end.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Line => Self::Line,
            Self::Arc { center, convex } => Self::Arc {
                center,
                convex: !convex,
            },
        }
    }
}

/// Data associated with a map edge.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// First endpoint.
    pub v1: VertexId,
    /// Second endpoint.
    pub v2: VertexId,
    /// Straight or curved shape.
    pub curve: EdgeCurve,
}

impl EdgeData {
    /// Creates a new edge.
    #[must_use]
    pub fn new(v1: VertexId, v2: VertexId, curve: EdgeCurve) -> Self {
        Self { v1, v2, curve }
    }

    /// Returns the endpoint opposite `v`, or `None` if `v` is not an endpoint.
    #[must_use]
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if v == self.v1 {
            Some(self.v2)
        } else if v == self.v2 {
            Some(self.v1)
        } else {
            None
        }
    }

    /// Returns `true` when `v` is one of the endpoints.
    #[must_use]
    pub fn touches(&self, v: VertexId) -> bool {
        self.v1 == v || self.v2 == v
    }

    #[must_use]
    pub fn is_curve(&self) -> bool {
        matches!(self.curve, EdgeCurve::Arc { .. })
    }

    /// Unordered endpoint key used for duplicate detection.
    #[must_use]
    pub fn key(&self) -> (VertexId, VertexId) {
        edge_key(self.v1, self.v2)
    }
}

/// Normalised unordered pair of endpoints.
#[must_use]
pub fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
