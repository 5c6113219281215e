use crate::math::geo_2d::polygon_bounds;
use crate::math::Point2;

/// Axis-aligned rectangle given by its lower-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub origin: Point2,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    #[must_use]
    pub fn new(origin: Point2, width: f64, height: f64) -> Self {
        Self { origin, width, height }
    }

    /// Rectangle spanned by two opposite corners in any order.
    #[must_use]
    pub fn from_corners(a: Point2, b: Point2) -> Self {
        let origin = Point2::new(a.x.min(b.x), a.y.min(b.y));
        Self::new(origin, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    /// Smallest rectangle holding every point.
    #[must_use]
    pub fn bounding(points: &[Point2]) -> Option<Self> {
        polygon_bounds(points).map(|(min, max)| Self::from_corners(min, max))
    }

    #[must_use]
    pub fn min(&self) -> Point2 {
        self.origin
    }

    #[must_use]
    pub fn max(&self) -> Point2 {
        Point2::new(self.origin.x + self.width, self.origin.y + self.height)
    }

    /// Corners in counter-clockwise order starting at the origin.
    #[must_use]
    pub fn corners(&self) -> [Point2; 4] {
        let (min, max) = (self.min(), self.max());
        [min, Point2::new(max.x, min.y), max, Point2::new(min.x, max.y)]
    }

    /// Finite with a positive width and height.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.origin.x.is_finite()
            && self.origin.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropCircle {
    pub center: Point2,
    pub radius: f64,
}

impl CropCircle {
    #[must_use]
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.center.x.is_finite() && self.center.y.is_finite() && self.radius.is_finite() && self.radius > 0.0
    }
}

/// The active crop boundary.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CropShape {
    /// No crop; maps pass through untouched.
    #[default]
    Undefined,
    Rectangle(CropRect),
    Circle(CropCircle),
    /// Closed polygon, last point joined back to the first.
    Polygon(Vec<Point2>),
}

impl CropShape {
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

/// Fixed width-to-height ratios a rectangle crop can be held to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AspectRatio {
    #[default]
    Unconstrained,
    Sqrt2,
    Sqrt3,
    Sqrt4,
    Sqrt5,
    Sqrt6,
    Sqrt7,
    Square,
    /// 4:3
    Sd,
    /// 16:9
    Hd,
}

impl AspectRatio {
    /// Ratio of the dependent dimension to the independent one, or `None`
    /// when unconstrained.
    #[must_use]
    pub fn multiplier(self) -> Option<f64> {
        let m = match self {
            Self::Unconstrained => return None,
            Self::Sqrt2 => std::f64::consts::SQRT_2,
            Self::Sqrt3 => 3.0_f64.sqrt(),
            Self::Sqrt4 => 2.0,
            Self::Sqrt5 => 5.0_f64.sqrt(),
            Self::Sqrt6 => 6.0_f64.sqrt(),
            Self::Sqrt7 => 7.0_f64.sqrt(),
            Self::Square => 1.0,
            Self::Sd => 4.0 / 3.0,
            Self::Hd => 16.0 / 9.0,
        };
        Some(m)
    }
}
