//! Repeat units: tile outlines, their placements inside one translational
//! cell, and the lattice that repeats the cell.

mod tile;

pub use tile::{Tile, TileEdge};

use tracing::warn;

use crate::math::transform_2d::translation;
use crate::math::{Transform2, Vector2};

/// A tile shape with every placement it has inside one cell.
#[derive(Debug, Clone)]
pub struct PlacedTile {
    pub tile: Tile,
    pub placements: Vec<Transform2>,
}

/// Inclusive range of lattice offsets `a·t1 + b·t2` a build covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillRegion {
    pub min_a: i32,
    pub max_a: i32,
    pub min_b: i32,
    pub max_b: i32,
}

impl FillRegion {
    #[must_use]
    pub fn new(min_a: i32, max_a: i32, min_b: i32, max_b: i32) -> Self {
        Self {
            min_a,
            max_a,
            min_b,
            max_b,
        }
    }

    /// Lattice offsets in row-major order. Empty if either range is inverted.
    pub fn offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (self.min_b..=self.max_b).flat_map(move |b| (self.min_a..=self.max_a).map(move |a| (a, b)))
    }
}

impl Default for FillRegion {
    /// Just the cell at the origin.
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

/// A periodic tiling: tile shapes placed in one cell, repeated along the
/// translation vectors `t1` and `t2`.
#[derive(Debug, Clone)]
pub struct Tiling {
    tiles: Vec<PlacedTile>,
    t1: Vector2,
    t2: Vector2,
    fill: FillRegion,
}

impl Tiling {
    #[must_use]
    pub fn new(t1: Vector2, t2: Vector2) -> Self {
        Self {
            tiles: Vec::new(),
            t1,
            t2,
            fill: FillRegion::default(),
        }
    }

    /// Adds a tile with its placements in the cell and returns its index.
    /// Non-finite placements are dropped.
    pub fn add_tile(&mut self, tile: Tile, placements: Vec<Transform2>) -> usize {
        let before = placements.len();
        let placements: Vec<Transform2> = placements.into_iter().filter(|m| m.iter().all(|v| v.is_finite())).collect();
        if placements.len() < before {
            warn!(dropped = before - placements.len(), "dropping non-finite tile placements");
        }
        self.tiles.push(PlacedTile { tile, placements });
        self.tiles.len() - 1
    }

    #[must_use]
    pub fn tiles(&self) -> &[PlacedTile] {
        &self.tiles
    }

    #[must_use]
    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index).map(|t| &t.tile)
    }

    #[must_use]
    pub fn num_tiles(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn t1(&self) -> Vector2 {
        self.t1
    }

    #[must_use]
    pub fn t2(&self) -> Vector2 {
        self.t2
    }

    #[must_use]
    pub fn fill(&self) -> FillRegion {
        self.fill
    }

    pub fn set_fill(&mut self, fill: FillRegion) {
        self.fill = fill;
    }

    /// Placements of tile `index` inside the cell at the origin.
    #[must_use]
    pub fn base_placements(&self, index: usize) -> &[Transform2] {
        self.tiles.get(index).map(|t| t.placements.as_slice()).unwrap_or_default()
    }

    /// Every placement of tile `index` over the fill region.
    #[must_use]
    pub fn placements(&self, index: usize) -> Vec<Transform2> {
        self.repeat(index, self.fill)
    }

    /// Placements of tile `index` over the cell at the origin and its eight
    /// neighbouring cells.
    #[must_use]
    pub fn neighbourhood(&self, index: usize) -> Vec<Transform2> {
        self.repeat(index, FillRegion::new(-1, 1, -1, 1))
    }

    fn repeat(&self, index: usize, region: FillRegion) -> Vec<Transform2> {
        let base = self.base_placements(index);
        region
            .offsets()
            .flat_map(move |(a, b)| {
                let shift = self.t1 * f64::from(a) + self.t2 * f64::from(b);
                let lattice = translation(shift.x, shift.y);
                base.iter().map(move |m| lattice * m)
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::transform_2d::transform_point;
    use crate::math::Point2;

    fn square_tiling() -> Tiling {
        let mut tiling = Tiling::new(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0));
        let square = Tile::polygon(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
        .unwrap();
        tiling.add_tile(square, vec![Transform2::identity()]);
        tiling
    }

    #[test]
    fn fill_repeats_base_placements() {
        let mut tiling = square_tiling();
        assert_eq!(tiling.placements(0).len(), 1);
        tiling.set_fill(FillRegion::new(0, 1, 0, 0));
        let placements = tiling.placements(0);
        assert_eq!(placements.len(), 2);
        let moved = transform_point(&placements[1], &Point2::origin());
        assert_abs_diff_eq!(moved.x, 1.0);
        assert_abs_diff_eq!(moved.y, 0.0);
    }

    #[test]
    fn neighbourhood_is_three_by_three() {
        let tiling = square_tiling();
        assert_eq!(tiling.neighbourhood(0).len(), 9);
        assert!(tiling.neighbourhood(5).is_empty());
    }

    #[test]
    fn non_finite_placements_are_dropped() {
        let mut tiling = square_tiling();
        let tile = tiling.tile(0).unwrap().clone();
        let index = tiling.add_tile(tile, vec![translation(f64::NAN, 0.0), translation(2.0, 0.0)]);
        assert_eq!(index, 1);
        assert_eq!(tiling.base_placements(1).len(), 1);
    }

    #[test]
    fn inverted_region_is_empty() {
        assert_eq!(FillRegion::new(1, 0, 0, 0).offsets().count(), 0);
    }
}
