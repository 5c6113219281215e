use crate::math::Point2;

use super::edge::EdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in a map.
    pub struct VertexId;
}

/// Data associated with a map vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 2D position of the vertex.
    pub position: Point2,
    /// Incident edges, unordered. Ids only; the map owns the edges.
    pub edges: Vec<EdgeId>,
}

impl VertexData {
    /// Creates a new vertex at the given point with no incident edges.
    #[must_use]
    pub fn new(position: Point2) -> Self {
        Self {
            position,
            edges: Vec::new(),
        }
    }

    /// Number of incident edges.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}
