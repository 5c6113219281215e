//! Crop boundaries: rectangle, circle or polygon, with optional aspect
//! constraints, that are either stitched into a map or used to clip it.

mod apply;
mod embed;
mod shape;

pub use apply::ApplyCrop;
pub use embed::EmbedCrop;
pub use shape::{AspectRatio, CropCircle, CropRect, CropShape};

use tracing::{debug, warn};

use crate::error::Result;
use crate::math::geo_2d::{dist, dist_to_polygon, point_in_polygon};
use crate::math::transform_2d::{scale_factor, transform_point};
use crate::math::{Point2, Tolerances, Transform2};
use crate::topology::Map;

/// A crop boundary and how it is used on a map.
///
/// With `embed` set the boundary edges are merged into the map so that
/// regions respect it. With `apply` set (and `embed` unset) everything outside
/// the boundary is filtered away without adding topology.
#[derive(Debug, Clone, PartialEq)]
pub struct Crop {
    shape: CropShape,
    aspect: AspectRatio,
    vertical: bool,
    embed: bool,
    apply: bool,
}

impl Default for Crop {
    fn default() -> Self {
        Self::new()
    }
}

impl Crop {
    /// Creates an undefined crop, which leaves maps untouched.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shape: CropShape::Undefined,
            aspect: AspectRatio::Unconstrained,
            vertical: false,
            embed: false,
            apply: false,
        }
    }

    #[must_use]
    pub fn shape(&self) -> &CropShape {
        &self.shape
    }

    /// Makes the crop a rectangle. Non-finite or empty rectangles are ignored.
    pub fn set_rect(&mut self, rect: CropRect) {
        if !rect.is_valid() {
            warn!(?rect, "ignoring invalid crop rectangle");
            return;
        }
        self.shape = CropShape::Rectangle(rect);
    }

    /// Makes the crop a circle. Non-finite or non-positive radii are ignored.
    pub fn set_circle(&mut self, circle: CropCircle) {
        if !circle.is_valid() {
            warn!(?circle, "ignoring invalid crop circle");
            return;
        }
        self.shape = CropShape::Circle(circle);
    }

    /// Makes the crop a closed polygon. Fewer than three points are ignored.
    pub fn set_polygon(&mut self, points: Vec<Point2>) {
        if points.len() < 3 || points.iter().any(|p| !(p.x.is_finite() && p.y.is_finite())) {
            warn!(points = points.len(), "ignoring invalid crop polygon");
            return;
        }
        self.shape = CropShape::Polygon(points);
    }

    /// Resets the crop to the undefined state.
    pub fn clear(&mut self) {
        self.shape = CropShape::Undefined;
    }

    #[must_use]
    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: AspectRatio) {
        self.aspect = aspect;
    }

    /// When set, `adjust` derives the height from the width instead of the
    /// width from the height.
    #[must_use]
    pub fn vertical(&self) -> bool {
        self.vertical
    }

    pub fn set_vertical(&mut self, vertical: bool) {
        self.vertical = vertical;
    }

    #[must_use]
    pub fn embed(&self) -> bool {
        self.embed
    }

    pub fn set_embed(&mut self, embed: bool) {
        self.embed = embed;
    }

    #[must_use]
    pub fn apply(&self) -> bool {
        self.apply
    }

    pub fn set_apply(&mut self, apply: bool) {
        self.apply = apply;
    }

    /// Applies the aspect constraint to a rectangle crop by recomputing its
    /// dependent dimension. Other shapes and unconstrained aspects are left
    /// as they are.
    pub fn adjust(&mut self) {
        let Some(m) = self.aspect.multiplier() else {
            return;
        };
        let CropShape::Rectangle(rect) = &mut self.shape else {
            debug!(aspect = ?self.aspect, "aspect constraint only applies to rectangles");
            return;
        };
        if self.vertical {
            rect.height = rect.width * m;
        } else {
            rect.width = rect.height * m;
        }
    }

    /// Maps the crop geometry through `matrix`.
    ///
    /// A rectangle becomes the bounding box of its mapped corners and a circle
    /// keeps its shape with the radius scaled by the transform's scale factor.
    pub fn transform(&mut self, matrix: &Transform2) {
        match &mut self.shape {
            CropShape::Undefined => {}
            CropShape::Rectangle(rect) => {
                let corners = rect.corners().map(|c| transform_point(matrix, &c));
                match CropRect::bounding(&corners) {
                    Some(mapped) if mapped.is_valid() => *rect = mapped,
                    _ => warn!("crop rectangle degenerated under transform, left unchanged"),
                }
            }
            CropShape::Circle(circle) => {
                circle.center = transform_point(matrix, &circle.center);
                circle.radius *= scale_factor(matrix);
            }
            CropShape::Polygon(points) => {
                for p in points.iter_mut() {
                    *p = transform_point(matrix, p);
                }
            }
        }
    }

    /// Returns `true` when `p` lies inside the crop or within `tol` of its
    /// boundary. An undefined crop contains everything.
    #[must_use]
    pub fn contains(&self, p: &Point2, tol: f64) -> bool {
        match &self.shape {
            CropShape::Undefined => true,
            CropShape::Rectangle(rect) => {
                let (min, max) = (rect.min(), rect.max());
                p.x >= min.x - tol && p.x <= max.x + tol && p.y >= min.y - tol && p.y <= max.y + tol
            }
            CropShape::Circle(circle) => dist(p, &circle.center) <= circle.radius + tol,
            CropShape::Polygon(points) => point_in_polygon(p, points) || dist_to_polygon(p, points) <= tol,
        }
    }

    /// Builds the crop outline as a map: four lines for a rectangle, one line
    /// per side for a polygon and four counter-clockwise quarter arcs for a
    /// circle. Undefined crops give an empty map.
    #[must_use]
    pub fn boundary_map(&self, tol: Tolerances) -> Map {
        let mut map = Map::new(tol);
        let outline: Vec<Point2> = match &self.shape {
            CropShape::Undefined => return map,
            CropShape::Rectangle(rect) => rect.corners().to_vec(),
            CropShape::Polygon(points) => points.clone(),
            CropShape::Circle(circle) => {
                let c = circle.center;
                let r = circle.radius;
                let quadrants = [
                    Point2::new(c.x + r, c.y),
                    Point2::new(c.x, c.y + r),
                    Point2::new(c.x - r, c.y),
                    Point2::new(c.x, c.y - r),
                ];
                for i in 0..4 {
                    if let Err(e) = map.insert_arc(quadrants[i], quadrants[(i + 1) % 4], c, false) {
                        warn!("skipping crop arc: {e}");
                    }
                }
                return map;
            }
        };
        let n = outline.len();
        for i in 0..n {
            if let Err(e) = map.insert_line(outline[i], outline[(i + 1) % n]) {
                warn!("skipping crop side: {e}");
            }
        }
        map
    }

    /// Embeds or applies the crop to `map` according to its flags.
    ///
    /// # Errors
    ///
    /// Returns an error only if embedding hits an inconsistent map.
    pub fn process(&self, map: &mut Map) -> Result<()> {
        if self.shape.is_undefined() {
            return Ok(());
        }
        if self.embed {
            EmbedCrop::new(self).execute(map)?;
        } else if self.apply {
            *map = ApplyCrop::new(self).execute(map);
        }
        Ok(())
    }
}
