mod crossings;

pub use crossings::ResolveCrossings;

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{MapError, Result, TessellisError};
use crate::math::transform_2d::{is_reflection, is_similarity, transform_point};
use crate::math::Transform2;
use crate::topology::{EdgeCurve, Map, VertexId};

/// Counts describing what one merge did to the target map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Vertices created in the target, including crossing vertices.
    pub vertices_added: usize,
    /// Incoming edges inserted as new edges.
    pub edges_added: usize,
    /// Incoming edges that already existed in the target.
    pub edges_shared: usize,
    /// Incoming edges dropped as degenerate.
    pub edges_dropped: usize,
    /// Edge splits performed while resolving crossings.
    pub splits: usize,
}

/// Merges a source map, placed by a transform, into a target map.
///
/// 1. Every incoming position (and arc center) is transformed.
/// 2. Each incoming vertex is found or created in the target within the
///    merge radius; non-finite vertices are rejected and their edges dropped.
/// 3. Incoming edges are remapped onto target vertices; duplicates collapse.
/// 4. Every pair of edges that now cross is split at the crossing, so both
///    share a new vertex (see [`ResolveCrossings`]).
pub struct MergeMap<'a> {
    source: &'a Map,
    transform: Transform2,
}

impl<'a> MergeMap<'a> {
    /// Creates a new `MergeMap` operation.
    #[must_use]
    pub fn new(source: &'a Map, transform: Transform2) -> Self {
        Self { source, transform }
    }

    /// Executes the merge, modifying the target in place.
    ///
    /// # Errors
    ///
    /// Returns an error only when the target map is internally inconsistent;
    /// degenerate incoming geometry is logged and skipped.
    pub fn execute(&self, target: &mut Map) -> Result<MergeReport> {
        let mut report = MergeReport::default();
        let vertices_before = target.num_vertices();

        if !is_similarity(&self.transform, target.tolerances().transform) {
            warn!("merging through a non-similarity transform, arcs will be distorted");
        }
        let flip = is_reflection(&self.transform);

        let mut remap: HashMap<VertexId, VertexId> = HashMap::with_capacity(self.source.num_vertices());
        for (id, vertex) in self.source.vertices() {
            let position = transform_point(&self.transform, &vertex.position);
            match target.insert_vertex(position) {
                Ok(v) => {
                    remap.insert(id, v);
                }
                Err(e) => warn!("rejecting incoming vertex: {e}"),
            }
        }

        let mut seeds = Vec::new();
        for (_, edge) in self.source.edges() {
            let (Some(&v1), Some(&v2)) = (remap.get(&edge.v1), remap.get(&edge.v2)) else {
                warn!("dropping incoming edge with a rejected endpoint");
                report.edges_dropped += 1;
                continue;
            };
            let curve = match edge.curve {
                EdgeCurve::Line => EdgeCurve::Line,
                EdgeCurve::Arc { center, convex } => EdgeCurve::Arc {
                    center: transform_point(&self.transform, &center),
                    convex: convex ^ flip,
                },
            };
            match target.insert_edge(v1, v2, curve) {
                Ok(e) => {
                    seeds.push(e);
                    report.edges_added += 1;
                }
                Err(TessellisError::Map(MapError::DuplicateEdge(_))) => report.edges_shared += 1,
                Err(e) => {
                    warn!("dropping incoming edge: {e}");
                    report.edges_dropped += 1;
                }
            }
        }

        report.splits = ResolveCrossings::new(seeds).execute(target)?;
        report.vertices_added = target.num_vertices() - vertices_before;

        debug!(
            vertices = target.num_vertices(),
            edges = target.num_edges(),
            ?report,
            "merged map"
        );
        Ok(report)
    }
}
