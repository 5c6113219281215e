use std::cmp::Ordering;

use crate::math::geo_2d::{dist, is_colinear, midpoint};
use crate::math::intersect_2d::intersection_params;
use crate::math::{Point2, Tolerances, Vector2};
use crate::tiling::Tile;

/// Quality of a candidate connection, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// Rays meet inside the tile after equal lengths.
    InsideEven,
    /// Rays run along one line towards each other.
    InsideColinear,
    /// Rays meet inside the tile after different lengths.
    InsideUneven,
    /// Rays meet outside the tile after equal lengths.
    OutsideEven,
    /// Rays meet outside the tile after different lengths.
    OutsideUneven,
    /// The rays never meet ahead of both points.
    None,
}

impl ContactKind {
    /// Position in the preference order; lower is better.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::InsideEven => 0,
            Self::InsideColinear => 1,
            Self::InsideUneven => 2,
            Self::OutsideEven => 3,
            Self::OutsideUneven => 4,
            Self::None => 5,
        }
    }

    #[must_use]
    pub fn is_inside(self) -> bool {
        matches!(self, Self::InsideEven | Self::InsideColinear | Self::InsideUneven)
    }
}

impl PartialOrd for ContactKind {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ContactKind {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// A point on the tile boundary where a line wants to enter the tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub position: Point2,
    /// Unit direction pointing into the tile.
    pub direction: Vector2,
    /// Tile side the point lies on.
    pub edge: usize,
    /// Position along that side, for boundary ordering.
    pub param: f64,
}

/// A candidate connection between two contact points.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub from: usize,
    pub to: usize,
    pub kind: ContactKind,
    /// Length of the drawn connection.
    pub distance: f64,
    /// Where the two rays meet, for kinds that bend there.
    pub meeting: Option<Point2>,
}

impl Contact {
    #[must_use]
    pub fn new(from: usize, to: usize, kind: ContactKind, distance: f64, meeting: Option<Point2>) -> Self {
        Self {
            from,
            to,
            kind,
            distance,
            meeting,
        }
    }

    /// Selection order: kind first, then distance. A better kind wins at any
    /// distance. Contacts joining different points may rank equal.
    #[must_use]
    pub fn cmp_rank(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.distance.total_cmp(&other.distance))
    }

    /// Classifies the connection between contact points `from` and `to`.
    #[must_use]
    pub fn classify(points: &[ContactPoint], from: usize, to: usize, tile: &Tile, tol: &Tolerances) -> Self {
        let none = Self::new(from, to, ContactKind::None, f64::INFINITY, None);
        let (Some(a), Some(b)) = (points.get(from), points.get(to)) else {
            return none;
        };
        let gap = b.position - a.position;
        if gap.norm() < tol.vertex_merge {
            return none;
        }

        let a_ahead = a.position + a.direction;
        if is_colinear(&a.position, &a_ahead, &b.position, tol.contact) {
            // Facing each other along one line.
            if a.direction.dot(&b.direction) < 0.0 && gap.dot(&a.direction) > 0.0 {
                let mid = midpoint(&a.position, &b.position);
                return Self::new(from, to, ContactKind::InsideColinear, gap.norm(), Some(mid));
            }
            return none;
        }

        let b_ahead = b.position + b.direction;
        let Some((s, t)) = intersection_params(&a.position, &a_ahead, &b.position, &b_ahead, tol) else {
            return none;
        };
        if s <= tol.contact || t <= tol.contact {
            return none;
        }
        let meeting = a.position + a.direction * s;
        let even = (s - t).abs() <= tol.contact * s.max(t).max(1.0);
        let inside = tile.contains(&meeting) || tile.dist_to_boundary(&meeting, tol) < tol.contact;
        let kind = match (inside, even) {
            (true, true) => ContactKind::InsideEven,
            (true, false) => ContactKind::InsideUneven,
            (false, true) => ContactKind::OutsideEven,
            (false, false) => ContactKind::OutsideUneven,
        };
        let distance = if kind.is_inside() {
            dist(&a.position, &meeting) + dist(&meeting, &b.position)
        } else {
            gap.norm()
        };
        Self::new(from, to, kind, distance, Some(meeting))
    }
}
