use super::{Point2, Transform2, Vector2, TOLERANCE};

/// Translation by `(dx, dy)`.
#[must_use]
pub fn translation(dx: f64, dy: f64) -> Transform2 {
    Transform2::new_translation(&Vector2::new(dx, dy))
}

/// Counter-clockwise rotation by `angle` radians about the origin.
#[must_use]
pub fn rotation(angle: f64) -> Transform2 {
    Transform2::new_rotation(angle)
}

/// Rotation by `angle` radians about `center`.
#[must_use]
pub fn rotation_about(center: &Point2, angle: f64) -> Transform2 {
    let t_pos = Transform2::new_translation(&center.coords);
    let t_neg = Transform2::new_translation(&(-center.coords));
    t_pos * rotation(angle) * t_neg
}

/// Uniform scaling about the origin.
#[must_use]
pub fn uniform_scale(factor: f64) -> Transform2 {
    Transform2::new_scaling(factor)
}

/// Mirror across the x axis (`y → -y`).
#[must_use]
pub fn reflection_x() -> Transform2 {
    Transform2::new_nonuniform_scaling(&Vector2::new(1.0, -1.0))
}

/// Applies a homogeneous transform to a point.
#[must_use]
pub fn transform_point(matrix: &Transform2, point: &Point2) -> Point2 {
    let v = matrix * nalgebra::Vector3::new(point.x, point.y, 1.0);
    Point2::new(v.x, v.y)
}

/// Applies the linear part of a transform to a direction.
#[must_use]
pub fn transform_vector(matrix: &Transform2, v: &Vector2) -> Vector2 {
    let r = matrix * nalgebra::Vector3::new(v.x, v.y, 0.0);
    Vector2::new(r.x, r.y)
}

/// Determinant of the linear 2x2 part.
#[must_use]
pub fn linear_determinant(matrix: &Transform2) -> f64 {
    matrix[(0, 0)] * matrix[(1, 1)] - matrix[(0, 1)] * matrix[(1, 0)]
}

/// Length scale factor of the transform, `sqrt(|det|)`. Exact for
/// similarity transforms, an area-preserving average otherwise.
#[must_use]
pub fn scale_factor(matrix: &Transform2) -> f64 {
    linear_determinant(matrix).abs().sqrt()
}

/// Returns `true` when the transform flips orientation.
#[must_use]
pub fn is_reflection(matrix: &Transform2) -> bool {
    linear_determinant(matrix) < 0.0
}

/// Returns `true` when the transform is a similarity: uniform scale,
/// rotation, optional reflection and translation, with no perspective part.
#[must_use]
pub fn is_similarity(matrix: &Transform2, tol: f64) -> bool {
    if matrix[(2, 0)].abs() > tol || matrix[(2, 1)].abs() > tol || (matrix[(2, 2)] - 1.0).abs() > tol {
        return false;
    }
    let col0 = Vector2::new(matrix[(0, 0)], matrix[(1, 0)]);
    let col1 = Vector2::new(matrix[(0, 1)], matrix[(1, 1)]);
    let (l0, l1) = (col0.norm(), col1.norm());
    if l0 < TOLERANCE || l1 < TOLERANCE {
        return false;
    }
    (l0 - l1).abs() <= tol * l0.max(1.0) && col0.dot(&col1).abs() <= tol * l0 * l1
}

/// Returns `true` when two transforms agree entry-wise within `tol`.
#[must_use]
pub fn approx_eq(a: &Transform2, b: &Transform2, tol: f64) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tol)
}
