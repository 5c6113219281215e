use std::collections::{HashSet, VecDeque};

use tracing::{trace, warn};

use crate::error::Result;
use crate::math::geo_2d::{circle_circle_intersect, dist, dist_to_segment, line_circle_intersect};
use crate::math::intersect_2d::true_intersection;
use crate::math::{ArcData, Point2, Tolerances};
use crate::topology::{EdgeCurve, EdgeId, Map, VertexId};

/// Upper bound on queue steps per seeded edge before giving up.
const STEPS_PER_EDGE: usize = 4096;

/// Splits edges so that no two edges cross, starting from a set of seed
/// edges (typically those a merge just inserted).
///
/// Each queued edge is checked, in order, for:
/// 1. an existing vertex lying inside it (collinear overlap, T-junction),
/// 2. one of its endpoints lying inside another edge,
/// 3. a proper crossing with another edge, which splits both.
///
/// Pieces produced by a split are queued again until nothing changes.
pub struct ResolveCrossings {
    seeds: Vec<EdgeId>,
}

impl ResolveCrossings {
    /// Creates a new `ResolveCrossings` operation.
    #[must_use]
    pub fn new(seeds: Vec<EdgeId>) -> Self {
        Self { seeds }
    }

    /// Executes the operation and returns the number of splits performed.
    ///
    /// # Errors
    ///
    /// Returns an error if the map is internally inconsistent.
    pub fn execute(&self, map: &mut Map) -> Result<usize> {
        let tol = *map.tolerances();
        let mut queue: VecDeque<EdgeId> = self.seeds.iter().copied().collect();
        let mut stalled: HashSet<(EdgeId, EdgeId)> = HashSet::new();
        let mut splits = 0;
        let mut steps = 0;
        let max_steps = STEPS_PER_EDGE * (self.seeds.len() + 1);

        'queue: while let Some(e) = queue.pop_front() {
            steps += 1;
            if steps > max_steps {
                warn!(remaining = queue.len(), "crossing resolution did not settle, giving up");
                break;
            }
            if !map.contains_edge(e) {
                continue;
            }

            if let Some(v) = vertex_inside_edge(map, e, &tol) {
                let pieces = map.split_edge(e, v)?;
                trace!(?e, ?v, "split at interior vertex");
                splits += 1;
                queue.extend(pieces);
                continue;
            }

            if let Some((f, v)) = edge_under_endpoint(map, e, &tol) {
                let pieces = map.split_edge(f, v)?;
                trace!(?f, ?v, "split under endpoint");
                splits += 1;
                queue.extend(pieces);
                queue.push_back(e);
                continue;
            }

            for f in map.edge_ids() {
                if f == e || stalled.contains(&(e, f)) {
                    continue;
                }
                let Some(point) = crossing(map, e, f, &tol) else {
                    continue;
                };
                let v = match map.insert_vertex(point) {
                    Ok(v) => v,
                    Err(err) => {
                        warn!("skipping crossing: {err}");
                        stalled.insert((e, f));
                        continue;
                    }
                };
                let pieces_e = map.split_edge(e, v)?;
                let pieces_f = map.split_edge(f, v)?;
                if pieces_e == [e] && pieces_f == [f] {
                    // The crossing snapped onto both edges' endpoints.
                    stalled.insert((e, f));
                    continue;
                }
                trace!(?e, ?f, x = point.x, y = point.y, "split at crossing");
                splits += 1;
                queue.extend(pieces_e);
                queue.extend(pieces_f);
                continue 'queue;
            }
        }

        Ok(splits)
    }
}

/// Returns `true` when `p` lies on edge `e` away from both endpoints.
fn lies_inside(map: &Map, e: EdgeId, p: &Point2, tol: &Tolerances) -> bool {
    let Ok((a, b)) = map.endpoints(e) else {
        return false;
    };
    let merge = tol.vertex_merge;
    if dist(p, &a) < merge || dist(p, &b) < merge {
        return false;
    }
    match map.arc_data(e) {
        Some(arc) => (dist(p, &arc.center()) - arc.radius()).abs() < merge && arc.point_within_arc(p),
        None => dist_to_segment(p, &a, &b) < merge,
    }
}

fn vertex_inside_edge(map: &Map, e: EdgeId, tol: &Tolerances) -> Option<VertexId> {
    let edge = map.edge(e).ok()?;
    map.vertices()
        .filter(|(id, _)| !edge.touches(*id))
        .find(|(_, vertex)| lies_inside(map, e, &vertex.position, tol))
        .map(|(id, _)| id)
}

fn edge_under_endpoint(map: &Map, e: EdgeId, tol: &Tolerances) -> Option<(EdgeId, VertexId)> {
    let edge = map.edge(e).ok()?;
    for v in [edge.v1, edge.v2] {
        let Ok(position) = map.position(v) else {
            continue;
        };
        let hit = map
            .edges()
            .filter(|(f, other)| *f != e && !other.touches(v))
            .find(|(f, _)| lies_inside(map, *f, &position, tol))
            .map(|(f, _)| f);
        if let Some(f) = hit {
            return Some((f, v));
        }
    }
    None
}

/// A point where edges `e` and `f` cross, excluding points that are an
/// endpoint of both.
fn crossing(map: &Map, e: EdgeId, f: EdgeId, tol: &Tolerances) -> Option<Point2> {
    let (a0, a1) = map.endpoints(e).ok()?;
    let (b0, b1) = map.endpoints(f).ok()?;
    let curve_e = map.edge(e).ok()?.curve;
    let curve_f = map.edge(f).ok()?.curve;

    match (curve_e, curve_f) {
        (EdgeCurve::Line, EdgeCurve::Line) => true_intersection(&a0, &a1, &b0, &b1, tol),
        (EdgeCurve::Line, EdgeCurve::Arc { .. }) => {
            let arc = map.arc_data(f)?;
            line_arc_crossing(&a0, &a1, &arc, tol)
        }
        (EdgeCurve::Arc { .. }, EdgeCurve::Line) => {
            let arc = map.arc_data(e)?;
            line_arc_crossing(&b0, &b1, &arc, tol)
        }
        (EdgeCurve::Arc { .. }, EdgeCurve::Arc { .. }) => {
            let arc_e = map.arc_data(e)?;
            let arc_f = map.arc_data(f)?;
            arc_arc_crossing(&arc_e, &arc_f, tol)
        }
    }
}

fn near_either(p: &Point2, a: &Point2, b: &Point2, tol: &Tolerances) -> bool {
    dist(p, a) < tol.vertex_merge || dist(p, b) < tol.vertex_merge
}

fn line_arc_crossing(p0: &Point2, p1: &Point2, arc: &ArcData, tol: &Tolerances) -> Option<Point2> {
    line_circle_intersect(p0, p1, &arc.center(), arc.radius())
        .into_iter()
        .filter(|x| dist_to_segment(x, p0, p1) < tol.vertex_merge)
        .filter(|x| arc.point_within_arc(x))
        .find(|x| !(near_either(x, p0, p1, tol) && near_either(x, &arc.start(), &arc.end(), tol)))
}

fn arc_arc_crossing(a: &ArcData, b: &ArcData, tol: &Tolerances) -> Option<Point2> {
    circle_circle_intersect(&a.center(), a.radius(), &b.center(), b.radius())
        .into_iter()
        .filter(|x| a.point_within_arc(x) && b.point_within_arc(x))
        .find(|x| !(near_either(x, &a.start(), &a.end(), tol) && near_either(x, &b.start(), &b.end(), tol)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn crossing_arcs_are_split() {
        let mut map = Map::new(Tolerances::default());
        // Upper half circles of two unit circles centred at x=0 and x=1.
        let a = map.insert_arc(p(-1.0, 0.0), p(1.0, 0.0), p(0.0, 0.0), true).unwrap();
        let b = map.insert_arc(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), true).unwrap();
        let splits = ResolveCrossings::new(vec![a, b]).execute(&mut map).unwrap();

        assert!(splits >= 1);
        let x = map.find_vertex(&p(0.5, 3.0_f64.sqrt() / 2.0)).unwrap();
        assert_eq!(map.neighbours(x).len(), 4);
        assert!(map.verify().is_empty());
    }

    #[test]
    fn chord_and_arc_sharing_endpoints_do_not_cross() {
        let mut map = Map::new(Tolerances::default());
        let arc = map.insert_arc(p(-1.0, 0.0), p(0.0, 1.0), p(0.0, 0.0), true).unwrap();
        let chord = map.insert_line(p(-1.0, 0.0), p(0.0, 1.0));
        // Same endpoint pair: rejected as duplicate, nothing to split.
        assert!(chord.is_err());
        let splits = ResolveCrossings::new(vec![arc]).execute(&mut map).unwrap();
        assert_eq!(splits, 0);
        assert_eq!(map.num_edges(), 1);
    }

    #[test]
    fn disjoint_edges_are_untouched() {
        let mut map = Map::new(Tolerances::default());
        let a = map.insert_line(p(0.0, 0.0), p(1.0, 0.0)).unwrap();
        let b = map.insert_line(p(0.0, 1.0), p(1.0, 1.0)).unwrap();
        let splits = ResolveCrossings::new(vec![a, b]).execute(&mut map).unwrap();
        assert_eq!(splits, 0);
        assert_eq!(map.num_edges(), 2);
    }

    #[test]
    fn star_of_lines_meets_at_one_vertex() {
        let mut map = Map::new(Tolerances::default());
        let mut seeds = Vec::new();
        for k in 0..3 {
            let angle = f64::from(k) * std::f64::consts::PI / 3.0;
            let (s, c) = angle.sin_cos();
            seeds.push(map.insert_line(p(-c, -s), p(c, s)).unwrap());
        }
        ResolveCrossings::new(seeds).execute(&mut map).unwrap();
        let center = map.find_vertex(&p(0.0, 0.0)).unwrap();
        assert_eq!(map.neighbours(center).len(), 6);
        assert_eq!(map.num_edges(), 6);
        assert!(map.verify().is_empty());
    }
}
