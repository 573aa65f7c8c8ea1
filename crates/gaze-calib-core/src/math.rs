//! Mathematical utilities and type definitions.
//!
//! This module provides the scalar/vector aliases used throughout the
//! workspace and a handful of helpers for reading head and eye transforms.
//!
//! Transforms follow the usual homogeneous convention:
//!
//! ```text
//! T = | R  t |
//!     | 0  1 |
//! ```
//!
//! where `R` is the 3×3 rotation block and `t` the translation.

use nalgebra::{Matrix3, Matrix4, Point2, Point3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 2D vector with [`Real`] components.
pub type Vec2 = Vector2<Real>;
/// 3D vector with [`Real`] components.
pub type Vec3 = Vector3<Real>;
/// 2D point with [`Real`] coordinates.
pub type Pt2 = Point2<Real>;
/// 3D point with [`Real`] coordinates.
pub type Pt3 = Point3<Real>;
/// 3×3 matrix with [`Real`] entries.
pub type Mat3 = Matrix3<Real>;
/// 4×4 homogeneous transform with [`Real`] entries.
pub type Mat4 = Matrix4<Real>;

/// Canonical forward direction of the tracking sensor.
pub const FORWARD: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Extract the 3×3 rotation block of a homogeneous transform.
pub fn rotation_block(transform: &Mat4) -> Mat3 {
    transform.fixed_view::<3, 3>(0, 0).into_owned()
}

/// Extract the translation column of a homogeneous transform.
pub fn translation(transform: &Mat4) -> Vec3 {
    transform.fixed_view::<3, 1>(0, 3).into_owned()
}

/// Forward (Z) axis of a transform expressed in world space.
///
/// This is column 2 of the rotation block, i.e. the first three rows of
/// column index 2.
pub fn forward_axis(transform: &Mat4) -> Vec3 {
    transform.fixed_view::<3, 1>(0, 2).into_owned()
}

/// Returns `true` when every entry of the transform is finite.
pub fn is_finite_transform(transform: &Mat4) -> bool {
    transform.iter().all(|v| v.is_finite())
}

// gimbal lock when within ATOL + RTOL·π/2 of ±90°
const GIMBAL_LOCK_ATOL: Real = 1e-8;
const GIMBAL_LOCK_RTOL: Real = 1e-5;

/// Head orientation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerAngles {
    /// Rotation about the forward axis (degrees).
    pub roll: Real,
    /// Rotation about the lateral axis (degrees).
    pub pitch: Real,
    /// Rotation about the vertical axis (degrees).
    pub yaw: Real,
}

impl EulerAngles {
    pub fn new(roll: Real, pitch: Real, yaw: Real) -> Self {
        Self { roll, pitch, yaw }
    }

    pub fn is_finite(&self) -> bool {
        self.roll.is_finite() && self.pitch.is_finite() && self.yaw.is_finite()
    }
}

/// Decompose the head rotation of `transform` into roll/pitch/yaw (degrees).
///
/// The angles are those of the capture tooling, which lays the 16 column-ordered
/// values out row by row and therefore reads the transposed rotation
/// `A = Rᵀ`. With `aij` the entries of `A` (so `a31 = R[0][2]`):
///
/// ```text
/// pitch = atan2(-a31, sqrt(a32² + a33²))
/// yaw   = atan2(a21, a11)
/// roll  = atan2(a32, a33)
/// ```
///
/// At gimbal lock (`pitch = ±90°`) yaw is pinned to zero and the whole
/// rotation about the remaining axis is reported as roll.
pub fn euler_angles_from_transform(transform: &Mat4) -> EulerAngles {
    let a = rotation_block(transform).transpose();
    let (a11, a12) = (a[(0, 0)], a[(0, 1)]);
    let (a21, a22) = (a[(1, 0)], a[(1, 1)]);
    let (a31, a32, a33) = (a[(2, 0)], a[(2, 1)], a[(2, 2)]);

    let pitch = (-a31).atan2((a32 * a32 + a33 * a33).sqrt());
    let half_pi = std::f64::consts::FRAC_PI_2;
    let lock_tol = GIMBAL_LOCK_ATOL + GIMBAL_LOCK_RTOL * half_pi;

    let (roll, yaw) = if (pitch - half_pi).abs() <= lock_tol {
        (a12.atan2(a22), 0.0)
    } else if (pitch + half_pi).abs() <= lock_tol {
        (-a12.atan2(a22), 0.0)
    } else {
        (a32.atan2(a33), a21.atan2(a11))
    };

    EulerAngles {
        roll: roll.to_degrees(),
        pitch: pitch.to_degrees(),
        yaw: yaw.to_degrees(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform_from_column_major;
    use nalgebra::{Rotation3, Translation3};

    fn transform(rot: Rotation3<Real>, t: Vec3) -> Mat4 {
        Translation3::from(t).to_homogeneous() * rot.to_homogeneous()
    }

    #[test]
    fn blocks_are_read_from_the_right_place() {
        let rot = Rotation3::from_euler_angles(0.1, -0.2, 0.3);
        let t = Vec3::new(0.01, -0.02, 0.4);
        let m = transform(rot, t);

        assert!((rotation_block(&m) - rot.matrix()).norm() < 1e-12);
        assert!((translation(&m) - t).norm() < 1e-12);
        assert!((forward_axis(&m) - rot.matrix().column(2)).norm() < 1e-12);
    }

    #[test]
    fn identity_has_zero_angles() {
        let e = euler_angles_from_transform(&Mat4::identity());
        assert!(e.roll.abs() < 1e-12);
        assert!(e.pitch.abs() < 1e-12);
        assert!(e.yaw.abs() < 1e-12);
    }

    #[test]
    fn recovers_zyx_angles_of_the_transposed_rotation() {
        let (roll, pitch, yaw): (Real, Real, Real) = (10.0, -20.0, 35.0);
        let rot = Rotation3::from_euler_angles(
            roll.to_radians(),
            pitch.to_radians(),
            yaw.to_radians(),
        );
        let e = euler_angles_from_transform(&rot.inverse().to_homogeneous());

        assert!((e.roll - roll).abs() < 1e-9, "roll {}", e.roll);
        assert!((e.pitch - pitch).abs() < 1e-9, "pitch {}", e.pitch);
        assert!((e.yaw - yaw).abs() < 1e-9, "yaw {}", e.yaw);
    }

    #[test]
    fn gimbal_lock_pins_yaw() {
        let rot = Rotation3::from_euler_angles(0.0, std::f64::consts::FRAC_PI_2, 0.0);
        let e = euler_angles_from_transform(&rot.inverse().to_homogeneous());
        assert!((e.pitch - 90.0).abs() < 1e-6);
        assert_eq!(e.yaw, 0.0);
    }

    #[test]
    fn capture_ordered_nod_matches_recorded_angles() {
        // head tilted up by 14 degrees, written column by column
        let (s, c) = 14.0_f64.to_radians().sin_cos();
        let values = [
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, -s, 0.0, //
            0.0, s, c, 0.0, //
            0.0, 0.0, -0.3, 1.0,
        ];
        let m = transform_from_column_major(&values).unwrap();
        let e = euler_angles_from_transform(&m);
        assert!((e.roll - 14.0).abs() < 1e-9, "roll {}", e.roll);
        assert!(e.pitch.abs() < 1e-9);
        assert!(e.yaw.abs() < 1e-9);
    }

    #[test]
    fn capture_rows_feed_the_formula() {
        let rot = Rotation3::from_euler_angles(0.2, -0.3, 0.5).to_homogeneous();
        let values = rot.as_slice().to_vec();
        let e = euler_angles_from_transform(&transform_from_column_major(&values).unwrap());

        // the capture tooling reads values[4 * i + j] as entry (i, j)
        let at = |i: usize, j: usize| values[4 * i + j];
        let pitch = (-at(2, 0)).atan2((at(2, 1).powi(2) + at(2, 2).powi(2)).sqrt());
        let yaw = at(1, 0).atan2(at(0, 0));
        let roll = at(2, 1).atan2(at(2, 2));
        assert!((e.roll - roll.to_degrees()).abs() < 1e-9);
        assert!((e.pitch - pitch.to_degrees()).abs() < 1e-9);
        assert!((e.yaw - yaw.to_degrees()).abs() < 1e-9);
    }

    #[test]
    fn non_finite_entries_are_detected() {
        let mut m = Mat4::identity();
        assert!(is_finite_transform(&m));
        m[(1, 3)] = Real::NAN;
        assert!(!is_finite_transform(&m));
    }
}
