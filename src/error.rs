use thiserror::Error;

use crate::topology::EdgeId;

/// Top-level error type for the tessellis map core.
#[derive(Debug, Error)]
pub enum TessellisError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("non-finite point ({x}, {y})")]
    NonFinite { x: f64, y: f64 },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to map (vertex/edge graph) manipulation.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("edge would join a vertex to itself")]
    SelfLoop,

    #[error("edge already present in map")]
    DuplicateEdge(EdgeId),
}

/// Errors related to higher level operations (motifs, prototypes, crops).
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`TessellisError`].
pub type Result<T> = std::result::Result<T, TessellisError>;
