//! Per-tile figure generators.
//!
//! A motif turns one tile of a tiling into a local map in tile coordinates.
//! The prototype merges that map through every placement of the tile.

mod explicit;
pub mod inferred;

pub use explicit::{ExplicitMotif, OutlineMotif};
pub use inferred::InferredMotif;

use std::fmt::Debug;

use crate::error::{OperationError, Result};
use crate::math::Tolerances;
use crate::tiling::{Tile, Tiling};
use crate::topology::Map;

/// Everything a motif may look at while building its local map.
#[derive(Debug, Clone, Copy)]
pub struct MotifContext<'a> {
    pub tiling: &'a Tiling,
    /// Index of the tile being filled.
    pub tile_index: usize,
    pub tolerances: Tolerances,
    /// Local maps already built for other tiles, indexed by tile. Only
    /// populated for motifs that ask for them.
    pub peers: &'a [Option<Map>],
}

impl<'a> MotifContext<'a> {
    #[must_use]
    pub fn new(tiling: &'a Tiling, tile_index: usize, tolerances: Tolerances) -> Self {
        Self {
            tiling,
            tile_index,
            tolerances,
            peers: &[],
        }
    }

    #[must_use]
    pub fn with_peers(mut self, peers: &'a [Option<Map>]) -> Self {
        self.peers = peers;
        self
    }

    /// The tile being filled.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the index is out of range.
    pub fn tile(&self) -> Result<&'a Tile> {
        self.tiling.tile(self.tile_index).ok_or_else(|| {
            OperationError::InvalidInput(format!(
                "tile {} not in tiling of {}",
                self.tile_index,
                self.tiling.num_tiles()
            ))
            .into()
        })
    }

    /// Local map built for tile `index`, if any.
    #[must_use]
    pub fn peer(&self, index: usize) -> Option<&'a Map> {
        self.peers.get(index).and_then(Option::as_ref)
    }
}

/// A figure generator for one tile.
pub trait Motif: Debug + Send + Sync {
    /// Builds the figure in the tile's local coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error when the motif cannot produce any figure for the
    /// context, e.g. an unknown tile.
    fn build_local_map(&self, ctx: &MotifContext<'_>) -> Result<Map>;

    /// Whether the motif reads the local maps of other tiles. Such motifs
    /// are built after every motif that does not.
    fn needs_peers(&self) -> bool {
        false
    }

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
