//! Composition of a tiling and its design elements into one map.

use std::sync::{Arc, Weak};

use tracing::{debug, warn};

use crate::crop::Crop;
use crate::error::{OperationError, Result};
use crate::math::Tolerances;
use crate::motif::{Motif, MotifContext};
use crate::tiling::Tiling;
use crate::topology::Map;

/// A motif assigned to one tile of the tiling.
#[derive(Debug)]
pub struct DesignElement {
    tile: usize,
    motif: Box<dyn Motif>,
}

impl DesignElement {
    #[must_use]
    pub fn new(tile: usize, motif: Box<dyn Motif>) -> Self {
        Self { tile, motif }
    }

    #[must_use]
    pub fn tile(&self) -> usize {
        self.tile
    }

    #[must_use]
    pub fn motif(&self) -> &dyn Motif {
        self.motif.as_ref()
    }
}

/// Design elements laid over a tiling, with an optional crop, and the
/// combined map they produce.
///
/// The map is built on first request and cached. Every mutation wipes the
/// cache. The tiling is held weakly; it belongs to the caller.
#[derive(Debug)]
pub struct Prototype {
    tiling: Weak<Tiling>,
    elements: Vec<DesignElement>,
    crop: Option<Crop>,
    cache: Option<Map>,
    tolerances: Tolerances,
}

impl Prototype {
    #[must_use]
    pub fn new(tiling: &Arc<Tiling>, tolerances: Tolerances) -> Self {
        Self {
            tiling: Arc::downgrade(tiling),
            elements: Vec::new(),
            crop: None,
            cache: None,
            tolerances,
        }
    }

    /// The tiling, if the caller still holds it.
    #[must_use]
    pub fn tiling(&self) -> Option<Arc<Tiling>> {
        self.tiling.upgrade()
    }

    pub fn set_tiling(&mut self, tiling: &Arc<Tiling>) {
        self.tiling = Arc::downgrade(tiling);
        self.wipeout_proto_map();
    }

    #[must_use]
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    #[must_use]
    pub fn elements(&self) -> &[DesignElement] {
        &self.elements
    }

    /// Appends an element and returns its index. Elements are merged in
    /// insertion order.
    pub fn add_element(&mut self, element: DesignElement) -> usize {
        self.elements.push(element);
        self.wipeout_proto_map();
        self.elements.len() - 1
    }

    pub fn remove_element(&mut self, index: usize) -> Option<DesignElement> {
        if index >= self.elements.len() {
            return None;
        }
        self.wipeout_proto_map();
        Some(self.elements.remove(index))
    }

    /// Replaces the motif of element `index`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if there is no such element.
    pub fn set_motif(&mut self, index: usize, motif: Box<dyn Motif>) -> Result<()> {
        let count = self.elements.len();
        let element = self
            .elements
            .get_mut(index)
            .ok_or_else(|| OperationError::InvalidInput(format!("no design element {index} of {count}")))?;
        element.motif = motif;
        self.wipeout_proto_map();
        Ok(())
    }

    #[must_use]
    pub fn crop(&self) -> Option<&Crop> {
        self.crop.as_ref()
    }

    pub fn set_crop(&mut self, crop: Crop) {
        self.crop = Some(crop);
        self.wipeout_proto_map();
    }

    pub fn clear_crop(&mut self) {
        self.crop = None;
        self.wipeout_proto_map();
    }

    /// Mutable access to the crop. Wipes the cached map, since the caller
    /// may change it.
    pub fn crop_mut(&mut self) -> Option<&mut Crop> {
        self.cache = None;
        self.crop.as_mut()
    }

    /// Drops the cached map; the next [`Prototype::proto_map`] rebuilds it.
    pub fn wipeout_proto_map(&mut self) {
        self.cache = None;
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.cache.is_some()
    }

    /// The combined map, built if not cached.
    pub fn proto_map(&mut self) -> &Map {
        if self.cache.is_none() {
            self.cache = Some(self.build());
        }
        let tolerances = self.tolerances;
        self.cache.get_or_insert_with(|| Map::new(tolerances))
    }

    /// Builds every local map, merges each through every placement of its
    /// tile in element order, then embeds or applies the crop.
    ///
    /// Motifs that read other tiles' maps are built after the rest. Failures
    /// are logged and skipped, so the result may have gaps but always exists.
    fn build(&self) -> Map {
        let mut out = Map::new(self.tolerances);
        let Some(tiling) = self.tiling.upgrade() else {
            warn!("prototype tiling was dropped, building an empty map");
            return out;
        };

        let mut locals: Vec<Option<Map>> = vec![None; self.elements.len()];
        for (i, element) in self.elements.iter().enumerate() {
            if !element.motif.needs_peers() {
                let ctx = MotifContext::new(&tiling, element.tile, self.tolerances);
                locals[i] = self.build_local(element, &ctx);
            }
        }

        let mut peers: Vec<Option<Map>> = vec![None; tiling.num_tiles()];
        for (element, local) in self.elements.iter().zip(&locals) {
            if let (Some(slot), Some(map)) = (peers.get_mut(element.tile), local) {
                if slot.is_none() {
                    *slot = Some(map.clone());
                }
            }
        }

        for (i, element) in self.elements.iter().enumerate() {
            if element.motif.needs_peers() {
                let ctx = MotifContext::new(&tiling, element.tile, self.tolerances).with_peers(&peers);
                locals[i] = self.build_local(element, &ctx);
            }
        }

        for (element, local) in self.elements.iter().zip(&locals) {
            let Some(local) = local else {
                continue;
            };
            for placement in tiling.placements(element.tile) {
                if let Err(e) = out.merge(local, &placement) {
                    warn!(tile = element.tile, "merge failed: {e}");
                }
            }
        }

        if let Some(crop) = &self.crop {
            if let Err(e) = crop.process(&mut out) {
                warn!("crop failed: {e}");
            }
        }

        debug!(
            elements = self.elements.len(),
            vertices = out.num_vertices(),
            edges = out.num_edges(),
            "built prototype map"
        );
        out
    }

    fn build_local(&self, element: &DesignElement, ctx: &MotifContext<'_>) -> Option<Map> {
        match element.motif.build_local_map(ctx) {
            Ok(map) => Some(map),
            Err(e) => {
                warn!(tile = element.tile, motif = element.motif.name(), "motif failed: {e}");
                None
            }
        }
    }
}

impl PartialEq for Prototype {
    /// Two prototypes are equal when they refer to the same tiling; their
    /// elements are not compared.
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.tiling, &other.tiling)
    }
}
