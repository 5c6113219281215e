use tracing::debug;

use crate::topology::Map;

use super::Crop;

/// Clips a map to a crop without adding topology: an edge survives when both
/// endpoints and its mid-point lie inside the crop (boundary inclusive).
pub struct ApplyCrop<'a> {
    crop: &'a Crop,
}

impl<'a> ApplyCrop<'a> {
    /// Creates a new `ApplyCrop` operation.
    #[must_use]
    pub fn new(crop: &'a Crop) -> Self {
        Self { crop }
    }

    /// Returns the clipped copy of `map`.
    #[must_use]
    pub fn execute(&self, map: &Map) -> Map {
        let tol = map.tolerances().contact;
        let clipped = map.retain_edges(|id, _| {
            let Ok((a, b)) = map.endpoints(id) else {
                return false;
            };
            let Ok(mid) = map.edge_mid_point(id) else {
                return false;
            };
            [a, b, mid].iter().all(|p| self.crop.contains(p, tol))
        });
        debug!(
            before = map.num_edges(),
            after = clipped.num_edges(),
            "applied crop"
        );
        clipped
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::crop::{CropCircle, CropRect};
    use crate::math::{Point2, Tolerances};

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn drops_edges_leaving_the_rect() {
        let mut map = Map::new(Tolerances::default());
        map.insert_line(p(1.0, 1.0), p(9.0, 1.0)).unwrap();
        map.insert_line(p(9.0, 1.0), p(12.0, 1.0)).unwrap();
        map.insert_line(p(0.0, 0.0), p(10.0, 0.0)).unwrap();

        let mut crop = Crop::new();
        crop.set_rect(CropRect::new(p(0.0, 0.0), 10.0, 10.0));
        let clipped = ApplyCrop::new(&crop).execute(&map);

        assert_eq!(clipped.num_edges(), 2);
        assert_eq!(clipped.num_vertices(), 4);
        assert!(clipped.find_vertex(&p(12.0, 1.0)).is_none());
    }

    #[test]
    fn arc_bulging_outside_is_dropped() {
        let mut map = Map::new(Tolerances::default());
        // Both ends inside the strip, the bulge rises above it.
        map.insert_arc(p(-0.5, 0.0), p(0.5, 0.0), p(0.0, -0.1), true).unwrap();

        let mut crop = Crop::new();
        crop.set_rect(CropRect::new(p(-1.0, -0.2), 2.0, 0.4));
        let clipped = ApplyCrop::new(&crop).execute(&map);
        assert_eq!(clipped.num_edges(), 0);

        crop.set_circle(CropCircle::new(p(0.0, 0.0), 0.6));
        assert_eq!(ApplyCrop::new(&crop).execute(&map).num_edges(), 1);
    }

    #[test]
    fn polygon_keeps_only_enclosed_edges() {
        let mut map = Map::new(Tolerances::default());
        map.insert_line(p(-1.0, 1.0), p(5.0, 1.0)).unwrap();
        map.insert_line(p(0.5, 0.5), p(1.0, 0.5)).unwrap();

        let mut crop = Crop::new();
        crop.set_polygon(vec![p(0.0, 0.0), p(4.0, 0.0), p(0.0, 4.0)]);
        let clipped = ApplyCrop::new(&crop).execute(&map);

        assert_eq!(clipped.num_edges(), 1);
        assert!(clipped.find_vertex(&p(0.5, 0.5)).is_some());
        assert!(clipped.find_vertex(&p(5.0, 1.0)).is_none());
    }

    #[test]
    fn process_applies_when_not_embedding() {
        let mut map = Map::new(Tolerances::default());
        map.insert_line(p(1.0, 1.0), p(2.0, 1.0)).unwrap();
        map.insert_line(p(20.0, 1.0), p(30.0, 1.0)).unwrap();

        let mut crop = Crop::new();
        crop.set_rect(CropRect::new(p(0.0, 0.0), 10.0, 10.0));
        crop.set_apply(true);
        crop.process(&mut map).unwrap();
        assert_eq!(map.num_edges(), 1);
    }
}
