pub mod merge;

pub use merge::{MergeMap, MergeReport, ResolveCrossings};
