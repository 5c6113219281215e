pub mod edge;
pub mod vertex;
pub mod vertex_index;

pub use edge::{edge_key, EdgeCurve, EdgeData, EdgeId};
pub use vertex::{VertexData, VertexId};
pub use vertex_index::VertexIndex;

use std::collections::HashMap;

use slotmap::SlotMap;
use tracing::warn;

use crate::error::{GeometryError, MapError, Result, TessellisError};
use crate::math::geo_2d::{dist, midpoint, polygon_bounds};
use crate::math::transform_2d::{is_reflection, is_similarity, transform_point};
use crate::math::{ArcData, Point2, Tolerances, Transform2, TOLERANCE};
use crate::operations::merge::{MergeMap, MergeReport};

/// A problem found by [`Map::verify`].
#[derive(Debug, Clone, PartialEq)]
pub enum MapDefect {
    /// Two distinct vertices lie within the merge radius.
    CoincidentVertices(VertexId, VertexId),
    /// Two edges join the same unordered endpoint pair.
    DuplicateEdge(EdgeId, EdgeId),
    /// An edge whose endpoints coincide.
    ZeroLengthEdge(EdgeId),
    /// An arc whose center sits on an endpoint.
    DegenerateArc(EdgeId),
    /// A vertex position with NaN or infinite coordinates.
    NonFinite(VertexId),
    /// A vertex lists an edge that does not exist or does not touch it.
    DanglingReference { vertex: VertexId, edge: EdgeId },
    /// An edge endpoint does not list the edge among its incident edges.
    MissingBackReference { edge: EdgeId, vertex: VertexId },
}

/// Planar graph of vertices and straight or curved edges.
///
/// Vertices and edges live in arenas and reference each other through
/// typed ids. No two vertices are closer than the merge radius and no two
/// edges share the same unordered endpoint pair. Iteration follows slot
/// order, which is insertion order except where a split reused the slot of
/// the edge it replaced.
#[derive(Debug, Clone, Default)]
pub struct Map {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    edge_lookup: HashMap<(VertexId, VertexId), EdgeId>,
    index: VertexIndex,
    tolerances: Tolerances,
}

impl Map {
    /// Creates a new, empty map.
    #[must_use]
    pub fn new(tolerances: Tolerances) -> Self {
        Self {
            tolerances,
            ..Self::default()
        }
    }

    /// Tolerances this map was created with.
    #[must_use]
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    // --- Vertex operations ---

    /// Returns the existing vertex within the merge radius of `position`,
    /// or creates one.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NonFinite` for NaN or infinite coordinates.
    pub fn insert_vertex(&mut self, position: Point2) -> Result<VertexId> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(GeometryError::NonFinite {
                x: position.x,
                y: position.y,
            }
            .into());
        }
        if let Some(existing) = self.find_vertex(&position) {
            return Ok(existing);
        }
        let id = self.vertices.insert(VertexData::new(position));
        self.index.insert(position, id);
        Ok(id)
    }

    /// Finds the vertex within the merge radius of `position`.
    #[must_use]
    pub fn find_vertex(&self, position: &Point2) -> Option<VertexId> {
        self.index
            .nearest_within(position, self.tolerances.vertex_merge)
            .filter(|id| self.vertices.contains_key(*id))
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the map.
    pub fn vertex(&self, id: VertexId) -> std::result::Result<&VertexData, MapError> {
        self.vertices
            .get(id)
            .ok_or(MapError::EntityNotFound("vertex"))
    }

    /// Returns the position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the map.
    pub fn position(&self, id: VertexId) -> std::result::Result<Point2, MapError> {
        self.vertex(id).map(|v| v.position)
    }

    /// Iterates vertices in slot order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &VertexData)> {
        self.vertices.iter()
    }

    /// Snapshot of all vertex ids.
    #[must_use]
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.vertices.keys().collect()
    }

    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Vertices joined to `id` by an edge.
    #[must_use]
    pub fn neighbours(&self, id: VertexId) -> Vec<VertexId> {
        let Some(vertex) = self.vertices.get(id) else {
            return Vec::new();
        };
        vertex
            .edges
            .iter()
            .filter_map(|e| self.edges.get(*e).and_then(|edge| edge.other(id)))
            .collect()
    }

    // --- Edge operations ---

    /// Inserts an edge between two existing vertices.
    ///
    /// # Errors
    ///
    /// Returns `MapError::SelfLoop` when both ends are the same vertex,
    /// `MapError::DuplicateEdge` when the pair is already joined, and a
    /// geometry error for arcs with a non-finite or zero-radius center.
    pub fn insert_edge(&mut self, v1: VertexId, v2: VertexId, curve: EdgeCurve) -> Result<EdgeId> {
        let p1 = self.position(v1)?;
        let p2 = self.position(v2)?;
        if v1 == v2 {
            return Err(MapError::SelfLoop.into());
        }
        if dist(&p1, &p2) < TOLERANCE {
            return Err(GeometryError::Degenerate("zero-length edge".into()).into());
        }
        if let EdgeCurve::Arc { center, .. } = curve {
            if !(center.x.is_finite() && center.y.is_finite()) {
                return Err(GeometryError::NonFinite {
                    x: center.x,
                    y: center.y,
                }
                .into());
            }
            if dist(&center, &p1) < TOLERANCE || dist(&center, &p2) < TOLERANCE {
                return Err(GeometryError::Degenerate("zero-radius arc".into()).into());
            }
        }
        let key = edge_key(v1, v2);
        if let Some(existing) = self.edge_lookup.get(&key) {
            return Err(MapError::DuplicateEdge(*existing).into());
        }

        let id = self.edges.insert(EdgeData::new(v1, v2, curve));
        self.edge_lookup.insert(key, id);
        for v in [v1, v2] {
            if let Some(vertex) = self.vertices.get_mut(v) {
                vertex.edges.push(id);
            }
        }
        Ok(id)
    }

    /// Inserts a straight edge between two positions, creating or reusing
    /// vertices as needed.
    ///
    /// # Errors
    ///
    /// See [`Map::insert_vertex`] and [`Map::insert_edge`].
    pub fn insert_line(&mut self, p1: Point2, p2: Point2) -> Result<EdgeId> {
        let v1 = self.insert_vertex(p1)?;
        let v2 = self.insert_vertex(p2)?;
        self.insert_edge(v1, v2, EdgeCurve::Line)
    }

    /// Inserts a circular arc between two positions.
    ///
    /// # Errors
    ///
    /// See [`Map::insert_vertex`] and [`Map::insert_edge`].
    pub fn insert_arc(&mut self, p1: Point2, p2: Point2, center: Point2, convex: bool) -> Result<EdgeId> {
        let v1 = self.insert_vertex(p1)?;
        let v2 = self.insert_vertex(p2)?;
        self.insert_edge(v1, v2, EdgeCurve::Arc { center, convex })
    }

    /// Returns a reference to the edge data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the map.
    pub fn edge(&self, id: EdgeId) -> std::result::Result<&EdgeData, MapError> {
        self.edges.get(id).ok_or(MapError::EntityNotFound("edge"))
    }

    /// Endpoint positions of an edge.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or one of its vertices is missing.
    pub fn endpoints(&self, id: EdgeId) -> std::result::Result<(Point2, Point2), MapError> {
        let edge = self.edge(id)?;
        Ok((self.position(edge.v1)?, self.position(edge.v2)?))
    }

    /// Iterates edges in slot order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Snapshot of all edge ids.
    #[must_use]
    pub fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.keys().collect()
    }

    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty()
    }

    /// Finds the edge joining two vertices, in either direction.
    #[must_use]
    pub fn find_edge(&self, v1: VertexId, v2: VertexId) -> Option<EdgeId> {
        self.edge_lookup.get(&edge_key(v1, v2)).copied()
    }

    /// Derived arc description for a curved edge; `None` for straight or
    /// missing edges.
    #[must_use]
    pub fn arc_data(&self, id: EdgeId) -> Option<ArcData> {
        let edge = self.edges.get(id)?;
        let EdgeCurve::Arc { center, convex } = edge.curve else {
            return None;
        };
        let (p1, p2) = self.endpoints(id).ok()?;
        Some(ArcData::new(p1, p2, center, convex, &self.tolerances))
    }

    /// Removes an edge and its back-references. Vertices stay.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the map.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<EdgeData> {
        let edge = self
            .edges
            .remove(id)
            .ok_or(MapError::EntityNotFound("edge"))?;
        self.edge_lookup.remove(&edge.key());
        for v in [edge.v1, edge.v2] {
            if let Some(vertex) = self.vertices.get_mut(v) {
                vertex.edges.retain(|e| *e != id);
            }
        }
        Ok(edge)
    }

    /// Replaces edge `id` by the two pieces `v1 → at` and `at → v2`.
    ///
    /// Arcs keep their center and convexity. A piece that would duplicate
    /// an existing edge is dropped. Splitting at an endpoint is a no-op.
    /// Returns the ids of the surviving pieces.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or the split vertex is missing.
    pub fn split_edge(&mut self, id: EdgeId, at: VertexId) -> Result<Vec<EdgeId>> {
        let edge = self.edge(id)?.clone();
        self.vertex(at)?;
        if edge.touches(at) {
            return Ok(vec![id]);
        }
        self.remove_edge(id)?;

        let mut pieces = Vec::with_capacity(2);
        for (a, b) in [(edge.v1, at), (at, edge.v2)] {
            match self.insert_edge(a, b, edge.curve) {
                Ok(piece) => pieces.push(piece),
                Err(TessellisError::Map(MapError::DuplicateEdge(_))) => {}
                Err(e) => warn!("dropping piece of split edge: {e}"),
            }
        }
        Ok(pieces)
    }

    // --- Whole-map operations ---

    /// Applies a transform to every vertex position and arc center.
    ///
    /// Angles and convexity are only preserved by similarity transforms;
    /// anything else is applied anyway and logged. Reflections flip
    /// convexity so arcs keep bulging to the same side.
    pub fn transform(&mut self, matrix: &Transform2) {
        if !is_similarity(matrix, self.tolerances.transform) {
            warn!("non-similarity transform applied to map, arcs will be distorted");
        }
        let flip = is_reflection(matrix);
        for (_, vertex) in &mut self.vertices {
            vertex.position = transform_point(matrix, &vertex.position);
        }
        for (_, edge) in &mut self.edges {
            if let EdgeCurve::Arc { center, convex } = edge.curve {
                edge.curve = EdgeCurve::Arc {
                    center: transform_point(matrix, &center),
                    convex: convex ^ flip,
                };
            }
        }
        self.index.clear();
        for (id, vertex) in &self.vertices {
            self.index.insert(vertex.position, id);
        }
    }

    /// Merges `other`, placed by `matrix`, into this map. See [`MergeMap`].
    ///
    /// # Errors
    ///
    /// Returns an error only on internal inconsistency of the maps.
    pub fn merge(&mut self, other: &Map, matrix: &Transform2) -> Result<MergeReport> {
        MergeMap::new(other, *matrix).execute(self)
    }

    /// Builds a new map holding only the edges accepted by `keep`, with
    /// their endpoints. Vertices without a kept edge are not carried over.
    #[must_use]
    pub fn retain_edges<F>(&self, mut keep: F) -> Map
    where
        F: FnMut(EdgeId, &EdgeData) -> bool,
    {
        let mut out = Map::new(self.tolerances);
        for (id, edge) in &self.edges {
            if !keep(id, edge) {
                continue;
            }
            let (Ok(p1), Ok(p2)) = (self.position(edge.v1), self.position(edge.v2)) else {
                continue;
            };
            let inserted = out
                .insert_vertex(p1)
                .and_then(|v1| out.insert_vertex(p2).map(|v2| (v1, v2)))
                .and_then(|(v1, v2)| out.insert_edge(v1, v2, edge.curve));
            if let Err(e) = inserted {
                warn!("edge not carried into filtered map: {e}");
            }
        }
        out
    }

    /// Axis-aligned bounds of all vertices and arc mid-points.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Point2, Point2)> {
        let mut points: Vec<Point2> = self.vertices.values().map(|v| v.position).collect();
        points.extend(
            self.edges
                .keys()
                .filter_map(|e| self.arc_data(e))
                .map(|arc| arc.mid_point()),
        );
        polygon_bounds(&points)
    }

    /// Point halfway along an edge (on the arc for curves).
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the map.
    pub fn edge_mid_point(&self, id: EdgeId) -> std::result::Result<Point2, MapError> {
        if let Some(arc) = self.arc_data(id) {
            return Ok(arc.mid_point());
        }
        let (p1, p2) = self.endpoints(id)?;
        Ok(midpoint(&p1, &p2))
    }

    /// Checks every structural invariant and returns what is violated.
    #[must_use]
    pub fn verify(&self) -> Vec<MapDefect> {
        let mut defects = Vec::new();

        for (id, vertex) in &self.vertices {
            if !(vertex.position.x.is_finite() && vertex.position.y.is_finite()) {
                defects.push(MapDefect::NonFinite(id));
            }
            for &e in &vertex.edges {
                if !self.edges.get(e).is_some_and(|edge| edge.touches(id)) {
                    defects.push(MapDefect::DanglingReference { vertex: id, edge: e });
                }
            }
        }

        let mut sorted: Vec<(VertexId, Point2)> =
            self.vertices.iter().map(|(id, v)| (id, v.position)).collect();
        sorted.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));
        let merge = self.tolerances.vertex_merge;
        for (i, (a, pa)) in sorted.iter().enumerate() {
            for (b, pb) in &sorted[i + 1..] {
                if pb.x - pa.x >= merge {
                    break;
                }
                if dist(pa, pb) < merge {
                    defects.push(MapDefect::CoincidentVertices(*a, *b));
                }
            }
        }

        let mut seen: HashMap<(VertexId, VertexId), EdgeId> = HashMap::new();
        for (id, edge) in &self.edges {
            if let Some(first) = seen.insert(edge.key(), id) {
                defects.push(MapDefect::DuplicateEdge(first, id));
            }
            for v in [edge.v1, edge.v2] {
                if !self.vertices.get(v).is_some_and(|vertex| vertex.edges.contains(&id)) {
                    defects.push(MapDefect::MissingBackReference { edge: id, vertex: v });
                }
            }
            if let Ok((p1, p2)) = self.endpoints(id) {
                if edge.v1 == edge.v2 || dist(&p1, &p2) < TOLERANCE {
                    defects.push(MapDefect::ZeroLengthEdge(id));
                }
                if let EdgeCurve::Arc { center, .. } = edge.curve {
                    if dist(&center, &p1) < TOLERANCE || dist(&center, &p2) < TOLERANCE {
                        defects.push(MapDefect::DegenerateArc(id));
                    }
                }
            }
        }

        defects
    }
}
