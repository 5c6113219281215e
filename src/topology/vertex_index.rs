use spade::{DelaunayTriangulation, HasPosition, Point2 as SpadePoint2, Triangulation};
use tracing::debug;

use crate::math::Point2;

use super::vertex::VertexId;

#[derive(Debug, Clone, Copy)]
struct IndexedVertex {
    position: SpadePoint2<f64>,
    id: VertexId,
}

impl HasPosition for IndexedVertex {
    type Scalar = f64;

    fn position(&self) -> SpadePoint2<f64> {
        self.position
    }
}

/// Nearest-vertex lookup over a map's vertex positions.
///
/// Backed by a Delaunay triangulation, whose greedy walk finds the true
/// nearest neighbour. Positions the triangulation refuses (out of its
/// representable range) go to a linear overflow list.
#[derive(Debug, Clone)]
pub struct VertexIndex {
    triangulation: DelaunayTriangulation<IndexedVertex>,
    overflow: Vec<(Point2, VertexId)>,
}

impl VertexIndex {
    #[must_use]
    pub fn new() -> Self {
        Self {
            triangulation: DelaunayTriangulation::new(),
            overflow: Vec::new(),
        }
    }

    /// Adds a vertex position to the index.
    pub fn insert(&mut self, position: Point2, id: VertexId) {
        let vertex = IndexedVertex {
            position: SpadePoint2::new(position.x, position.y),
            id,
        };
        if let Err(e) = self.triangulation.insert(vertex) {
            debug!(x = position.x, y = position.y, "vertex index overflow: {e}");
            self.overflow.push((position, id));
        }
    }

    /// Returns the vertex nearest to `position` if it lies strictly within
    /// `radius`.
    #[must_use]
    pub fn nearest_within(&self, position: &Point2, radius: f64) -> Option<VertexId> {
        let mut best: Option<(f64, VertexId)> = None;
        if let Some(handle) = self
            .triangulation
            .nearest_neighbor(SpadePoint2::new(position.x, position.y))
        {
            let data = handle.data();
            let d = (data.position.x - position.x).hypot(data.position.y - position.y);
            best = Some((d, data.id));
        }
        for (p, id) in &self.overflow {
            let d = (p - position).norm();
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, *id));
            }
        }
        best.filter(|(d, _)| *d < radius).map(|(_, id)| id)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.triangulation = DelaunayTriangulation::new();
        self.overflow.clear();
    }

    /// Number of indexed positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triangulation.num_vertices() + self.overflow.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for VertexIndex {
    fn default() -> Self {
        Self::new()
    }
}
