pub mod crop;
pub mod error;
pub mod math;
pub mod motif;
pub mod operations;
pub mod prototype;
pub mod tiling;
pub mod topology;

pub use error::{Result, TessellisError};
