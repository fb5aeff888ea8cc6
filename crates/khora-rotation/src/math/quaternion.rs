// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Provides a Quaternion type for representing 3D rotations.
//!
//! # Conventions
//!
//! * Angles given to the axis-angle constructors are **left-handed**: a positive
//!   angle turns clockwise when looking down the axis toward the origin. The
//!   constructors negate it before applying the (right-handed) half-angle formula.
//!   A quarter turn about `+Z` therefore maps `+X` to `-Y`.
//! * [`Quaternion::to_axis_angle`] reports the right-handed angle and axis of the
//!   stored quaternion, so feeding its output back into `from_axis_angle` needs the
//!   angle negated.
//! * Matrices are addressed through [`MatrixElements`] as `(row, col)` of a matrix
//!   applied to column vectors.

use approx::{AbsDiffEq, RelativeEq};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use super::{MatrixElements, Vec3, Vec4, EPSILON, PI};
use crate::error::{RotationError, RotationResult};
use std::ops::{Add, Mul, Neg};

/// Distance of the normalized dot product from `±1` under which two directions
/// are treated as parallel by [`Quaternion::from_rotation_arc`].
const ALIGNMENT_EPSILON: f32 = 1e-5;

/// Value of `1 - cos(omega)` under which slerp degrades to a linear blend.
const SLERP_EPSILON: f64 = 1e-5;

/// Allowed deviation of the squared magnitude from 1 for a "unit" quaternion.
const UNIT_TOLERANCE: f32 = 1e-3;

/// Cyclic successor of each axis index: `x -> y -> z -> x`.
const NEXT_AXIS: [usize; 3] = [1, 2, 0];

/// Represents a quaternion for 3D rotations.
///
/// A quaternion is stored as `(x, y, z, w)`, where `[x, y, z]` is the "vector" part
/// and `w` is the "scalar" part. For representing rotations, it should be a "unit
/// quaternion" where `x² + y² + z² + w² = 1`. The conversions in this module assume
/// that invariant and never re-normalize their inputs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    bytemuck::Pod,
    bytemuck::Zeroable,
    Serialize,
    Deserialize,
    Encode,
    Decode,
)]
#[repr(C)]
pub struct Quaternion {
    /// The x component of the vector part.
    pub x: f32,
    /// The y component of the vector part.
    pub y: f32,
    /// The z component of the vector part.
    pub z: f32,
    /// The scalar (real) part.
    pub w: f32,
}

impl Quaternion {
    /// The identity quaternion, representing no rotation.
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a new quaternion from its raw components.
    ///
    /// Note: This does not guarantee a unit quaternion. For creating rotations,
    /// prefer `from_axis_angle` or the other rotation-specific constructors.
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    // --- Axis-angle ---

    /// Creates a rotation of `angle` radians (left-handed) about the axis `(x, y, z)`.
    ///
    /// The axis does not need to be normalized, but it must not be zero: a zero axis
    /// yields NaN components. This is asserted in debug builds only; see
    /// [`Quaternion::try_from_axis_angle`] for a checked version.
    #[inline]
    pub fn from_axis_angle_xyz(angle: f32, x: f32, y: f32, z: f32) -> Self {
        let length_squared = x * x + y * y + z * z;
        debug_assert!(
            length_squared > 0.0,
            "rotation axis must have non-zero length"
        );

        let inverse_norm = 1.0 / length_squared.sqrt();
        let (sin_half, cos_half) = (-angle * 0.5).sin_cos();

        Self {
            x: x * sin_half * inverse_norm,
            y: y * sin_half * inverse_norm,
            z: z * sin_half * inverse_norm,
            w: cos_half,
        }
    }

    /// Creates a rotation of `angle` radians (left-handed) about `axis`.
    ///
    /// Same as [`Quaternion::from_axis_angle_xyz`] with the axis passed as a vector.
    #[inline]
    pub fn from_axis_angle(angle: f32, axis: Vec3) -> Self {
        Self::from_axis_angle_xyz(angle, axis.x, axis.y, axis.z)
    }

    /// Checked version of [`Quaternion::from_axis_angle`].
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::DegenerateAxis`] if `axis` has zero (or non-finite) length.
    pub fn try_from_axis_angle(angle: f32, axis: Vec3) -> RotationResult<Self> {
        let length_squared = axis.length_squared();
        if !(length_squared > 0.0 && length_squared.is_finite()) {
            log::debug!("Rejected rotation axis {axis:?}: zero or non-finite length.");
            return Err(RotationError::DegenerateAxis);
        }
        Ok(Self::from_axis_angle(angle, axis))
    }

    /// Returns the right-handed rotation angle (radians) and the axis of this rotation.
    ///
    /// The angle is `2 * atan2(|xyz|, w)` and the axis is the vector part divided by
    /// its length. Callers must not use this on a rotation at or near identity: the
    /// axis is undefined there and comes back as NaN or infinite components. The
    /// quaternion is assumed to be unit length.
    #[inline]
    pub fn to_axis_angle(&self) -> (f32, Vec3) {
        let (angle, x, y, z) = self.to_axis_angle_xyz();
        (angle, Vec3::new(x, y, z))
    }

    /// Scalar form of [`Quaternion::to_axis_angle`], returning `(angle, x, y, z)`.
    #[inline]
    pub fn to_axis_angle_xyz(&self) -> (f32, f32, f32, f32) {
        let sin_half = (self.x * self.x + self.y * self.y + self.z * self.z).sqrt();
        debug_assert!(
            sin_half > 0.0,
            "axis of an identity rotation is undefined"
        );

        let angle = 2.0 * sin_half.atan2(self.w);
        (
            angle,
            self.x / sin_half,
            self.y / sin_half,
            self.z / sin_half,
        )
    }

    /// Checked version of [`Quaternion::to_axis_angle`].
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::UndefinedAxis`] when the length of the vector part
    /// does not exceed [`EPSILON`], and [`RotationError::NotNormalized`] when the
    /// quaternion is not unit length.
    pub fn try_to_axis_angle(&self) -> RotationResult<(f32, Vec3)> {
        self.check_normalized()?;
        let sin_half_angle = self.vector_part().length();
        if !(sin_half_angle > EPSILON) {
            log::debug!("Rejected axis extraction: rotation {self:?} is too close to identity.");
            return Err(RotationError::UndefinedAxis { sin_half_angle });
        }
        Ok(self.to_axis_angle())
    }

    // --- Vector alignment ---

    /// Creates the shortest-arc rotation that turns direction `from` onto direction `to`.
    ///
    /// Neither vector needs to be normalized, but both must be non-zero.
    ///
    /// * Directions whose normalized dot product is within `1e-5` of 1 give the identity.
    /// * Directions within `1e-5` of -1 give a half turn about
    ///   an axis perpendicular to `from`, built by crossing `from` with `(1, 1, 1)`
    ///   after zeroing the component where `from` is largest.
    /// * Otherwise the rotation is `acos` of the normalized dot product about the
    ///   plane normal of the two directions.
    pub fn from_rotation_arc(from: Vec3, to: Vec3) -> Self {
        let cos_angle = from.dot(to) / (from.length() * to.length());

        if (cos_angle - 1.0).abs() < ALIGNMENT_EPSILON {
            log::trace!("Rotation arc between coincident directions, using identity.");
            // Any axis works for a zero angle.
            Self::from_axis_angle_xyz(0.0, 1.0, 0.0, 0.0)
        } else if (cos_angle + 1.0).abs() < ALIGNMENT_EPSILON {
            let mut helper = Vec3::ONE;
            helper[from.max_abs_axis()] = 0.0;
            let axis = from.cross(helper);
            log::trace!("Rotation arc between opposite directions, half turn about {axis:?}.");
            Self::from_axis_angle(PI, axis)
        } else {
            // `to x from` under the left-handed angle is the right-handed turn about
            // `from x to`, which carries `from` toward `to`.
            Self::from_axis_angle(cos_angle.acos(), to.cross(from))
        }
    }

    /// Checked version of [`Quaternion::from_rotation_arc`].
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::ZeroLengthVector`] if either direction has zero
    /// (or non-finite) length.
    pub fn try_from_rotation_arc(from: Vec3, to: Vec3) -> RotationResult<Self> {
        for v in [from, to] {
            let length_squared = v.length_squared();
            if !(length_squared > 0.0 && length_squared.is_finite()) {
                log::debug!("Rejected rotation arc: direction {v:?} has no usable length.");
                return Err(RotationError::ZeroLengthVector);
            }
        }
        Ok(Self::from_rotation_arc(from, to))
    }

    // --- Matrix bridge ---

    /// Creates a quaternion from the upper 3x3 rotation block of a matrix.
    ///
    /// Uses the trace when it is positive. Otherwise pivots on the largest diagonal
    /// element, which keeps the square root away from zero for half-turn and
    /// near-half-turn rotations. The block is assumed to be a pure rotation.
    pub fn from_matrix<M: MatrixElements + ?Sized>(matrix: &M) -> Self {
        let m = |row: usize, col: usize| matrix.element(row, col);
        let trace = m(0, 0) + m(1, 1) + m(2, 2);

        if trace > 0.0 {
            let s = (trace + 1.0).sqrt();
            let w = s * 0.5;
            let s = 0.5 / s;
            return Self {
                x: (m(2, 1) - m(1, 2)) * s,
                y: (m(0, 2) - m(2, 0)) * s,
                z: (m(1, 0) - m(0, 1)) * s,
                w,
            };
        }

        let mut i = 0;
        if m(1, 1) > m(0, 0) {
            i = 1;
        }
        if m(2, 2) > m(i, i) {
            i = 2;
        }
        let j = NEXT_AXIS[i];
        let k = NEXT_AXIS[j];

        let mut s = ((m(i, i) - (m(j, j) + m(k, k))) + 1.0).sqrt();
        let mut q = [0.0f32; 4];
        q[i] = s * 0.5;
        if s != 0.0 {
            s = 0.5 / s;
        }
        q[3] = (m(k, j) - m(j, k)) * s;
        q[j] = (m(i, j) + m(j, i)) * s;
        q[k] = (m(i, k) + m(k, i)) * s;

        Self::new(q[0], q[1], q[2], q[3])
    }

    /// Overwrites `matrix` with the pure rotation this quaternion represents.
    ///
    /// The upper 3x3 block receives the rotation, the translation column and the
    /// bottom row are cleared, and the homogeneous corner is set to 1.
    pub fn write_to_matrix<M: MatrixElements + ?Sized>(&self, matrix: &mut M) {
        let x2 = self.x + self.x;
        let y2 = self.y + self.y;
        let z2 = self.z + self.z;

        let xx = self.x * x2;
        let xy = self.x * y2;
        let xz = self.x * z2;
        let yy = self.y * y2;
        let yz = self.y * z2;
        let zz = self.z * z2;
        let wx = self.w * x2;
        let wy = self.w * y2;
        let wz = self.w * z2;

        let rotation = [
            [1.0 - (yy + zz), xy - wz, xz + wy],
            [xy + wz, 1.0 - (xx + zz), yz - wx],
            [xz - wy, yz + wx, 1.0 - (xx + yy)],
        ];

        for (row, values) in rotation.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                matrix.set_element(row, col, value);
            }
            matrix.set_element(row, 3, 0.0);
            matrix.set_element(3, row, 0.0);
        }
        matrix.set_element(3, 3, 1.0);
    }

    // --- Interpolation ---

    /// Performs a Spherical Linear Interpolation (Slerp) from `from` to `to`.
    ///
    /// `t = 0` returns `from` and `t = 1` returns `to` exactly. `t` is not clamped;
    /// values outside `[0, 1]` extrapolate along the same great circle. The trig
    /// runs in `f64`. When the inputs are nearly identical the weights fall back to
    /// a plain linear blend. The result is not re-normalized.
    ///
    /// Unlike the textbook formulation, `to` is **not** negated when the 4D dot
    /// product is negative, so quaternions more than 90° apart as 4D vectors are
    /// blended the long way round.
    pub fn slerp(t: f32, from: Self, to: Self) -> Self {
        debug_assert!(
            from.is_normalized() && to.is_normalized(),
            "slerp expects unit quaternions"
        );

        let cos_omega = f64::from(from.dot(to));
        let t = f64::from(t);

        let (scale_from, scale_to) = if (1.0 - cos_omega) > SLERP_EPSILON {
            let omega = cos_omega.acos();
            let sin_omega = omega.sin();
            (
                ((1.0 - t) * omega).sin() / sin_omega,
                (t * omega).sin() / sin_omega,
            )
        } else {
            (1.0 - t, t)
        };

        Self::from(from.as_vec4() * scale_from as f32 + to.as_vec4() * scale_to as f32)
    }

    /// Checked version of [`Quaternion::slerp`].
    ///
    /// # Errors
    ///
    /// Returns [`RotationError::NotNormalized`] if either endpoint is not unit length.
    pub fn try_slerp(t: f32, from: Self, to: Self) -> RotationResult<Self> {
        from.check_normalized()?;
        to.check_normalized()?;
        Ok(Self::slerp(t, from, to))
    }

    // --- Utilities ---

    /// Returns the vector part `(x, y, z)`.
    #[inline]
    pub fn vector_part(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Returns the four components as a `Vec4`.
    #[inline]
    pub fn as_vec4(&self) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, self.w)
    }

    /// Calculates the squared length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude_squared(&self) -> f32 {
        self.dot(*self)
    }

    /// Calculates the length (magnitude) of the quaternion.
    #[inline]
    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Returns `true` if the squared magnitude is within a small tolerance of 1.
    #[inline]
    pub fn is_normalized(&self) -> bool {
        (self.magnitude_squared() - 1.0).abs() < UNIT_TOLERANCE
    }

    /// Returns a normalized version of the quaternion with a length of 1.
    /// If the squared magnitude is at most `EPSILON` (not `EPSILON²` as in
    /// [`Vec3::normalize`]), it returns the identity quaternion.
    pub fn normalize(&self) -> Self {
        let mag_sq = self.magnitude_squared();
        if mag_sq > EPSILON {
            *self * (1.0 / mag_sq.sqrt())
        } else {
            Self::IDENTITY
        }
    }

    /// Computes the 4D dot product of two quaternions.
    #[inline]
    pub fn dot(&self, other: Self) -> f32 {
        self.as_vec4().dot(other.as_vec4())
    }

    fn check_normalized(&self) -> RotationResult<()> {
        if self.is_normalized() {
            Ok(())
        } else {
            let magnitude_squared = self.magnitude_squared();
            log::debug!("Rejected quaternion {self:?}: squared magnitude {magnitude_squared}.");
            Err(RotationError::NotNormalized { magnitude_squared })
        }
    }
}

// --- Trait implementations ---

impl Default for Quaternion {
    /// Returns the identity quaternion, representing no rotation.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Vec4> for Quaternion {
    #[inline]
    fn from(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Quaternion> for Vec4 {
    #[inline]
    fn from(q: Quaternion) -> Self {
        q.as_vec4()
    }
}

impl Add<Quaternion> for Quaternion {
    type Output = Self;
    /// Adds two quaternions component-wise.
    /// Note: This is not a rotation composition.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::from(self.as_vec4() + rhs.as_vec4())
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;
    /// Scales all components of the quaternion by a scalar.
    #[inline]
    fn mul(self, scalar: f32) -> Self::Output {
        Self::from(self.as_vec4() * scalar)
    }
}

impl Neg for Quaternion {
    type Output = Self;
    /// Negates all components. The result represents the same rotation.
    #[inline]
    fn neg(self) -> Self::Output {
        Self::from(-self.as_vec4())
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.as_vec4().abs_diff_eq(&other.as_vec4(), epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.as_vec4()
            .relative_eq(&other.as_vec4(), epsilon, max_relative)
    }
}
