use crate::error::Result;
use crate::math::Transform2;
use crate::operations::{MergeMap, MergeReport};
use crate::topology::Map;

use super::Crop;

/// Stitches a crop outline into a map using the regular merge, so regions
/// filled afterwards stop at the crop.
pub struct EmbedCrop<'a> {
    crop: &'a Crop,
}

impl<'a> EmbedCrop<'a> {
    /// Creates a new `EmbedCrop` operation.
    #[must_use]
    pub fn new(crop: &'a Crop) -> Self {
        Self { crop }
    }

    /// Executes the embedding, modifying the map in place.
    ///
    /// # Errors
    ///
    /// Returns an error only if the target map is inconsistent.
    pub fn execute(&self, map: &mut Map) -> Result<MergeReport> {
        let outline = self.crop.boundary_map(*map.tolerances());
        MergeMap::new(&outline, Transform2::identity()).execute(map)
    }
}
