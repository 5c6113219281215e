use crate::error::Result;
use crate::math::Transform2;
use crate::topology::Map;

use super::{Motif, MotifContext};

/// A figure drawn by hand, stored as a map in tile coordinates.
#[derive(Debug, Clone)]
pub struct ExplicitMotif {
    map: Map,
}

impl ExplicitMotif {
    #[must_use]
    pub fn new(map: Map) -> Self {
        Self { map }
    }

    #[must_use]
    pub fn map(&self) -> &Map {
        &self.map
    }
}

impl Motif for ExplicitMotif {
    /// Copies the stored figure into a map using the context tolerances.
    fn build_local_map(&self, ctx: &MotifContext<'_>) -> Result<Map> {
        let mut local = Map::new(ctx.tolerances);
        local.merge(&self.map, &Transform2::identity())?;
        Ok(local)
    }

    fn name(&self) -> &'static str {
        "explicit"
    }
}

/// Draws the tile's own outline.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineMotif;

impl Motif for OutlineMotif {
    fn build_local_map(&self, ctx: &MotifContext<'_>) -> Result<Map> {
        Ok(ctx.tile()?.boundary_map(ctx.tolerances))
    }

    fn name(&self) -> &'static str {
        "outline"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point2, Tolerances, Vector2};
    use crate::tiling::{Tile, Tiling};

    fn tiling() -> Tiling {
        let mut tiling = Tiling::new(Vector2::new(2.0, 0.0), Vector2::new(0.0, 2.0));
        tiling.add_tile(Tile::regular(6).unwrap(), vec![Transform2::identity()]);
        tiling
    }

    #[test]
    fn outline_follows_tile() {
        let tiling = tiling();
        let ctx = MotifContext::new(&tiling, 0, Tolerances::default());
        let map = OutlineMotif.build_local_map(&ctx).unwrap();
        assert_eq!(map.num_vertices(), 6);
        assert_eq!(map.num_edges(), 6);
    }

    #[test]
    fn outline_of_unknown_tile_fails() {
        let tiling = tiling();
        let ctx = MotifContext::new(&tiling, 3, Tolerances::default());
        assert!(OutlineMotif.build_local_map(&ctx).is_err());
    }

    #[test]
    fn explicit_resolves_its_own_crossings() {
        let tol = Tolerances::default();
        // An X drawn as two independent strokes in a map that never merged them.
        let mut drawn = Map::new(tol);
        drawn.insert_line(Point2::new(-0.5, -0.5), Point2::new(0.5, 0.5)).unwrap();
        drawn.insert_line(Point2::new(-0.5, 0.5), Point2::new(0.5, -0.5)).unwrap();
        let motif = ExplicitMotif::new(drawn);

        let tiling = tiling();
        let map = motif.build_local_map(&MotifContext::new(&tiling, 0, tol)).unwrap();
        assert_eq!(map.num_edges(), 4);
        assert_eq!(motif.map().num_edges(), 2);
        assert!(map.find_vertex(&Point2::origin()).is_some());
    }
}
