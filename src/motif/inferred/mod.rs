//! Motif inference: continue the lines of neighbouring tiles into a tile
//! and join them up inside it.
//!
//! 1. Neighbouring tile instances are mapped into the subject tile's frame
//!    and kept when their outline touches one of the subject's side
//!    mid-points.
//! 2. Lines of a neighbour's local map that end on a shared side become
//!    contact points, pointing into the subject. A side without any gets
//!    one at its mid-point along the inward normal.
//! 3. Contact points are paired greedily in boundary order, each taking
//!    its best-ranked [`Contact`].
//! 4. Each chosen contact is drawn; points without a usable contact are
//!    left open.

mod contact;

pub use contact::{Contact, ContactKind, ContactPoint};

use tracing::{debug, warn};

use crate::error::{MapError, Result, TessellisError};
use crate::math::geo_2d::dist;
use crate::math::transform_2d::{approx_eq, transform_point};
use crate::math::{Point2, Tolerances, Transform2, TOLERANCE};
use crate::operations::ResolveCrossings;
use crate::tiling::Tile;
use crate::topology::Map;

use super::{Motif, MotifContext};

/// A neighbouring tile instance in the subject tile's frame.
#[derive(Debug, Clone)]
struct Neighbour {
    tile: usize,
    /// Maps the neighbour's local frame into the subject's.
    transform: Transform2,
    /// Subject sides this instance touches.
    sides: Vec<usize>,
}

/// Builds a figure for a tile from the figures of the tiles around it.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferredMotif;

impl InferredMotif {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Contact points of the subject tile, sorted by side and by position
    /// along the side.
    #[must_use]
    pub fn contact_points(&self, ctx: &MotifContext<'_>, tile: &Tile) -> Vec<ContactPoint> {
        let tol = ctx.tolerances;
        let neighbours = adjacent_instances(ctx, tile);
        let mut points: Vec<ContactPoint> = Vec::new();

        for n in &neighbours {
            let Some(peer) = ctx.peer(n.tile) else {
                continue;
            };
            for (id, edge) in peer.edges() {
                if edge.is_curve() {
                    continue;
                }
                let Ok((a, b)) = peer.endpoints(id) else {
                    continue;
                };
                let a = transform_point(&n.transform, &a);
                let b = transform_point(&n.transform, &b);
                for (near, far) in [(a, b), (b, a)] {
                    if let Some(point) = continuation(tile, &n.sides, near, far, &tol) {
                        push_unique(&mut points, point, &tol);
                    }
                }
            }
        }

        for (k, side) in tile.edges().iter().enumerate() {
            if points.iter().any(|p| p.edge == k) {
                continue;
            }
            let Some(normal) = tile.inward_normal(k) else {
                continue;
            };
            let position = side.mid_point(&tol);
            points.push(ContactPoint {
                position,
                direction: normal,
                edge: k,
                param: side.parameter_of(&position),
            });
        }

        points.sort_by(|a, b| a.edge.cmp(&b.edge).then_with(|| a.param.total_cmp(&b.param)));
        points
    }

    /// Greedy boundary-order pairing. Each untaken point takes its best
    /// candidate among the untaken points; `ContactKind::None` leaves it
    /// open.
    #[must_use]
    pub fn match_contacts(&self, points: &[ContactPoint], tile: &Tile, tol: &Tolerances) -> Vec<Contact> {
        let mut taken = vec![false; points.len()];
        let mut chosen = Vec::new();
        for i in 0..points.len() {
            if taken[i] {
                continue;
            }
            let best = (0..points.len())
                .filter(|&j| j != i && !taken[j])
                .map(|j| Contact::classify(points, i, j, tile, tol))
                .min_by(Contact::cmp_rank);
            match best {
                Some(c) if c.kind != ContactKind::None => {
                    taken[c.from] = true;
                    taken[c.to] = true;
                    chosen.push(c);
                }
                _ => debug!(point = i, edge = points[i].edge, "no usable contact, leaving a gap"),
            }
        }
        chosen
    }
}

impl Motif for InferredMotif {
    fn build_local_map(&self, ctx: &MotifContext<'_>) -> Result<Map> {
        let tile = ctx.tile()?;
        let tol = ctx.tolerances;
        let points = self.contact_points(ctx, tile);
        let contacts = self.match_contacts(&points, tile, &tol);

        let mut map = Map::new(tol);
        for c in &contacts {
            let (a, b) = (points[c.from].position, points[c.to].position);
            match (c.kind, c.meeting) {
                (ContactKind::InsideEven | ContactKind::InsideUneven, Some(m)) => {
                    insert_stroke(&mut map, a, m);
                    insert_stroke(&mut map, m, b);
                }
                _ => insert_stroke(&mut map, a, b),
            }
        }
        ResolveCrossings::new(map.edge_ids()).execute(&mut map)?;

        debug!(
            tile = ctx.tile_index,
            contact_points = points.len(),
            contacts = contacts.len(),
            edges = map.num_edges(),
            "inferred motif"
        );
        Ok(map)
    }

    fn needs_peers(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "inferred"
    }
}

fn insert_stroke(map: &mut Map, a: Point2, b: Point2) {
    match map.insert_line(a, b) {
        Ok(_) | Err(TessellisError::Map(MapError::DuplicateEdge(_))) => {}
        Err(e) => warn!("skipping inferred stroke: {e}"),
    }
}

/// Neighbouring tile instances touching the subject, across all of the
/// subject's placements in the cell.
fn adjacent_instances(ctx: &MotifContext<'_>, tile: &Tile) -> Vec<Neighbour> {
    let tol = ctx.tolerances;
    let Some((min, max)) = tile.bounds(&tol) else {
        return Vec::new();
    };
    let mids = tile.mid_points(&tol);
    let reach = tol.contact;

    let mut subject_placements = ctx.tiling.base_placements(ctx.tile_index).to_vec();
    if subject_placements.is_empty() {
        subject_placements.push(Transform2::identity());
    }

    let mut found: Vec<Neighbour> = Vec::new();
    for p in &subject_placements {
        let Some(p_inv) = p.try_inverse() else {
            warn!(tile = ctx.tile_index, "skipping singular tile placement");
            continue;
        };
        for (j, placed) in ctx.tiling.tiles().iter().enumerate() {
            for q in ctx.tiling.neighbourhood(j) {
                let m = p_inv * q;
                if j == ctx.tile_index && approx_eq(&m, &Transform2::identity(), tol.transform) {
                    continue;
                }
                if found.iter().any(|n| n.tile == j && approx_eq(&n.transform, &m, tol.transform)) {
                    continue;
                }
                let other = placed.tile.transformed(&m);
                let Some((omin, omax)) = other.bounds(&tol) else {
                    continue;
                };
                if omin.x > max.x + reach || omax.x < min.x - reach || omin.y > max.y + reach || omax.y < min.y - reach {
                    continue;
                }
                let sides: Vec<usize> = mids
                    .iter()
                    .enumerate()
                    .filter(|(_, mid)| other.dist_to_boundary(mid, &tol) < reach)
                    .map(|(k, _)| k)
                    .collect();
                if !sides.is_empty() {
                    found.push(Neighbour {
                        tile: j,
                        transform: m,
                        sides,
                    });
                }
            }
        }
    }
    found
}

/// A contact point where the line `far → near` crosses into the subject
/// through one of `sides`.
fn continuation(tile: &Tile, sides: &[usize], near: Point2, far: Point2, tol: &Tolerances) -> Option<ContactPoint> {
    let direction = (near - far).try_normalize(TOLERANCE)?;
    sides.iter().find_map(|&k| {
        let side = tile.edges().get(k)?;
        if side.distance_to(&near, tol) >= tol.contact || side.distance_to(&far, tol) < tol.contact {
            return None;
        }
        let inward = tile.inward_normal(k)?;
        if direction.dot(&inward) <= tol.angle {
            return None;
        }
        Some(ContactPoint {
            position: near,
            direction,
            edge: k,
            param: side.parameter_of(&near),
        })
    })
}

fn push_unique(points: &mut Vec<ContactPoint>, point: ContactPoint, tol: &Tolerances) {
    let duplicate = points.iter().any(|p| {
        dist(&p.position, &point.position) < tol.vertex_merge && 1.0 - p.direction.dot(&point.direction) < tol.angle
    });
    if !duplicate {
        points.push(point);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::transform_2d::translation;
    use crate::math::Vector2;
    use crate::tiling::Tiling;

    fn unit_square() -> Tile {
        Tile::polygon(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ])
        .unwrap()
    }

    fn square_tiling() -> Tiling {
        let mut tiling = Tiling::new(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0));
        tiling.add_tile(unit_square(), vec![Transform2::identity()]);
        tiling
    }

    #[test]
    fn every_side_gets_a_fallback_contact() {
        let tiling = square_tiling();
        let ctx = MotifContext::new(&tiling, 0, Tolerances::default());
        let points = InferredMotif.contact_points(&ctx, tiling.tile(0).unwrap());
        assert_eq!(points.len(), 4);
        assert_eq!(points.iter().map(|p| p.edge).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_abs_diff_eq!(points[0].direction.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn square_without_peers_meets_at_center() {
        let tiling = square_tiling();
        let ctx = MotifContext::new(&tiling, 0, Tolerances::default());
        let map = InferredMotif.build_local_map(&ctx).unwrap();

        let center = map.find_vertex(&Point2::new(0.5, 0.5)).unwrap();
        assert_eq!(map.num_edges(), 4);
        assert_eq!(map.num_vertices(), 5);
        assert_eq!(map.neighbours(center).len(), 4);
        for (id, _) in map.edges() {
            let edge = map.edge(id).unwrap();
            assert!(edge.touches(center));
        }
    }

    #[test]
    fn neighbour_lines_are_continued() {
        // Two squares per cell; the right one carries a horizontal stroke.
        let tol = Tolerances::default();
        let mut tiling = Tiling::new(Vector2::new(2.0, 0.0), Vector2::new(0.0, 1.0));
        tiling.add_tile(unit_square(), vec![Transform2::identity()]);
        tiling.add_tile(unit_square(), vec![translation(1.0, 0.0)]);

        let mut stroke = Map::new(tol);
        stroke.insert_line(Point2::new(0.0, 0.25), Point2::new(1.0, 0.25)).unwrap();
        let peers = vec![None, Some(stroke)];

        let ctx = MotifContext::new(&tiling, 0, tol).with_peers(&peers);
        let tile = tiling.tile(0).unwrap();
        let points = InferredMotif.contact_points(&ctx, tile);
        assert_eq!(points.len(), 4);
        assert!(points.iter().any(|p| p.edge == 1 && (p.position.y - 0.25).abs() < 1e-9));
        assert!(points.iter().any(|p| p.edge == 3 && (p.position.y - 0.25).abs() < 1e-9));

        let map = InferredMotif.build_local_map(&ctx).unwrap();
        // A cross: the stroke carried through, crossed by the vertical fallback pair.
        let crossing = map.find_vertex(&Point2::new(0.5, 0.25)).unwrap();
        assert_eq!(map.neighbours(crossing).len(), 4);
        assert_eq!(map.num_edges(), 4);
        assert!(map.verify().is_empty());
    }

    #[test]
    fn corner_neighbours_are_not_adjacent() {
        let tiling = square_tiling();
        let ctx = MotifContext::new(&tiling, 0, Tolerances::default());
        let neighbours = adjacent_instances(&ctx, tiling.tile(0).unwrap());
        assert_eq!(neighbours.len(), 4);
        assert!(neighbours.iter().all(|n| n.sides.len() == 1));
    }

    #[test]
    fn near_identical_placements_follow_transform_tolerance() {
        let mut tiling = Tiling::new(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0));
        tiling.add_tile(unit_square(), vec![Transform2::identity(), translation(0.0, 1e-7)]);
        let tile = tiling.tile(0).unwrap();

        let strict = MotifContext::new(&tiling, 0, Tolerances::default());
        assert!(adjacent_instances(&strict, tile).len() > 4);

        let loose = MotifContext::new(&tiling, 0, Tolerances::default().with_transform(1e-6));
        let neighbours = adjacent_instances(&loose, tile);
        assert_eq!(neighbours.len(), 4);
        assert!(neighbours.iter().all(|n| n.sides.len() == 1));
    }

    #[test]
    fn unmatched_point_is_left_open() {
        let tol = Tolerances::default();
        let tile = unit_square();
        let points = [ContactPoint {
            position: Point2::new(0.5, 0.0),
            direction: Vector2::new(0.0, 1.0),
            edge: 0,
            param: 0.5,
        }];
        assert!(InferredMotif.match_contacts(&points, &tile, &tol).is_empty());
    }
}
