pub mod arc_2d;
pub mod geo_2d;
pub mod intersect_2d;
pub mod tolerance;
pub mod transform_2d;

pub use arc_2d::ArcData;
pub use tolerance::Tolerances;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// 3x3 homogeneous matrix used as a 2D affine transform.
pub type Transform2 = nalgebra::Matrix3<f64>;

/// Absolute floor below which a length is treated as zero.
pub const TOLERANCE: f64 = 1e-10;
