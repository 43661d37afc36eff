//! Helpers on top of the `Transform` (2x3 affine) public interface.
//!
//! The transform type itself is `euclid::default::Transform2D<f64>`; this
//! module only adds the handful of derived quantities the stroke and arc
//! machinery need (`determinant`, `major_axis`, distance-only transforms,
//! and a fallible inverse).

use crate::{Point, Transform, Vector};

/// Returned by [`device_to_user`] / [`device_to_user_distance`] when the
/// transform has no inverse.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Singular;

impl core::fmt::Display for Singular {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "transform matrix is singular and cannot be inverted")
    }
}

impl std::error::Error for Singular {}

/// `a*d - b*c` for the transform's 2x2 linear part `((a,b),(c,d))`.
#[inline]
pub fn determinant(t: &Transform) -> f64 {
    t.m11 * t.m22 - t.m12 * t.m21
}

/// Applies the transform's linear part only (no translation).
#[inline]
pub fn user_to_device_distance(t: &Transform, v: Vector<f64>) -> Vector<f64> {
    t.transform_vector(v)
}

/// Full forward transform of a point.
#[inline]
pub fn user_to_device(t: &Transform, p: Point<f64>) -> Point<f64> {
    t.transform_point(p)
}

/// Inverse-transforms a point back to user space.
pub fn device_to_user(t: &Transform, p: Point<f64>) -> Result<Point<f64>, Singular> {
    t.inverse().map(|inv| inv.transform_point(p)).ok_or(Singular)
}

/// Inverse-transforms a vector (linear part only) back to user space.
pub fn device_to_user_distance(t: &Transform, v: Vector<f64>) -> Result<Vector<f64>, Singular> {
    t.inverse().map(|inv| inv.transform_vector(v)).ok_or(Singular)
}

/// The length, in device space, of the longer axis of the ellipse that a
/// circle of radius `r` in user space becomes under `t`'s linear part.
/// Used to convert a user-space tolerance into an angular step for both
/// the arc approximator and the pen.
pub fn major_axis(t: &Transform, r: f64) -> f64 {
    let (a, b, c, d) = (t.m11, t.m12, t.m21, t.m22);

    if is_unity_scale(a, b, c, d) {
        return r;
    }

    let f = (a * a + b * b + c * c + d * d) * 0.5;
    let g = (a * a + b * b - c * c - d * d) * 0.5;
    let h = a * c + b * d;
    r * (f + (g * g + h * h).sqrt()).sqrt()
}

/// Fast path: a rotation/reflection with no scaling has orthonormal basis
/// columns and a determinant of +-1.
fn is_unity_scale(a: f64, b: f64, c: f64, d: f64) -> bool {
    const EPS: f64 = 1e-9;
    let det = a * d - b * c;
    (det.abs() - 1.0).abs() < EPS
        && (a * a + b * b - 1.0).abs() < EPS
        && (c * c + d * d - 1.0).abs() < EPS
        && (a * c + b * d).abs() < EPS
}

#[cfg(test)]
mod tests {
    use super::*;
    use euclid::Angle;

    #[test]
    fn identity_determinant_is_one() {
        assert_eq!(determinant(&Transform::identity()), 1.0);
    }

    #[test]
    fn rotation_preserves_major_axis() {
        let t = Transform::rotation(Angle::radians(0.7));
        assert!((major_axis(&t, 10.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn uniform_scale_major_axis() {
        let t = Transform::scale(2.0, 2.0);
        assert!((major_axis(&t, 10.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn anisotropic_scale_major_axis_is_the_larger_extent() {
        let t = Transform::scale(3.0, 1.0);
        assert!((major_axis(&t, 1.0) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn device_to_user_round_trips() {
        let t = Transform::translation(5.0, -3.0).then_scale(2.0, 2.0);
        let p = Point::new(12.0, 8.0);
        let dev = user_to_device(&t, p);
        let back = device_to_user(&t, dev).unwrap();
        assert!((back.x - p.x).abs() < 1e-9);
        assert!((back.y - p.y).abs() < 1e-9);
    }

    #[test]
    fn singular_transform_fails_to_invert() {
        let t = Transform::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(device_to_user(&t, Point::new(1.0, 1.0)).is_err());
    }
}
