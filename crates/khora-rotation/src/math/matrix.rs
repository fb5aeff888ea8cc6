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

//! Defines the [`MatrixElements`] capability and the `Mat4` type implementing it.
//!
//! The quaternion/matrix bridge does not care how a matrix is stored. It only
//! needs to read and write individual elements addressed as `(row, col)` of a
//! matrix that transforms column vectors (`v' = M * v`).

use approx::{AbsDiffEq, RelativeEq};

use super::{Quaternion, Vec3, Vec4};
use std::ops::Mul;

/// Indexed access to the elements of a 4x4 matrix.
///
/// `row` and `col` are in `0..4`. Implementations must interpret them for a
/// matrix applied to column vectors, so that translation lives in column 3 and
/// `element(1, 0)` is the `y` output of transforming the X axis.
pub trait MatrixElements {
    /// Returns the element at `(row, col)`.
    fn element(&self, row: usize, col: usize) -> f32;

    /// Overwrites the element at `(row, col)`.
    fn set_element(&mut self, row: usize, col: usize, value: f32);
}

/// Plain nested arrays are read as row-major: `m[row][col]`.
impl MatrixElements for [[f32; 4]; 4] {
    #[inline]
    fn element(&self, row: usize, col: usize) -> f32 {
        self[row][col]
    }

    #[inline]
    fn set_element(&mut self, row: usize, col: usize, value: f32) {
        self[row][col] = value;
    }
}

// --- Mat4 ---

/// A 4x4 column-major matrix.
///
/// `cols[c][r]` holds the element at row `r`, column `c`. The layout matches
/// what GPU APIs expect for uniform uploads.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat4 {
    /// The columns of the matrix. `cols[0]` is the first column, and so on.
    pub cols: [Vec4; 4],
}

impl Mat4 {
    /// The 4x4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [Vec4::X, Vec4::Y, Vec4::Z, Vec4::W],
    };

    /// A 4x4 matrix with all elements set to 0.
    pub const ZERO: Self = Self {
        cols: [Vec4::ZERO; 4],
    };

    /// Creates a new matrix from four column vectors.
    #[inline]
    pub fn from_cols(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Self {
        Self {
            cols: [c0, c1, c2, c3],
        }
    }

    /// Returns a row of the matrix as a `Vec4`.
    #[inline]
    pub fn get_row(&self, index: usize) -> Vec4 {
        Vec4::new(
            self.cols[0][index],
            self.cols[1][index],
            self.cols[2][index],
            self.cols[3][index],
        )
    }

    /// Creates a pure rotation matrix from a quaternion.
    ///
    /// See [`Quaternion::write_to_matrix`].
    #[inline]
    pub fn from_quat(q: Quaternion) -> Self {
        let mut m = Self::ZERO;
        q.write_to_matrix(&mut m);
        m
    }

    /// Transforms a direction (`w = 0`), ignoring translation.
    #[inline]
    pub fn transform_vector3(&self, v: Vec3) -> Vec3 {
        (*self * Vec4::from_vec3(v, 0.0)).truncate()
    }
}

impl Default for Mat4 {
    /// Returns the 4x4 identity matrix.
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl MatrixElements for Mat4 {
    #[inline]
    fn element(&self, row: usize, col: usize) -> f32 {
        self.cols[col][row]
    }

    #[inline]
    fn set_element(&mut self, row: usize, col: usize, value: f32) {
        self.cols[col][row] = value;
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;
    /// Transforms a `Vec4` by this matrix.
    #[inline]
    fn mul(self, rhs: Vec4) -> Self::Output {
        self.cols[0] * rhs.x + self.cols[1] * rhs.y + self.cols[2] * rhs.z + self.cols[3] * rhs.w
    }
}

// Closed-form reference matrices for the tests.
#[cfg(test)]
impl Mat4 {
    pub(crate) fn from_translation(v: Vec3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = Vec4::from_vec3(v, 1.0);
        m
    }

    /// Right-handed rotation about X.
    pub(crate) fn from_rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::X,
            Vec4::new(0.0, c, s, 0.0),
            Vec4::new(0.0, -s, c, 0.0),
            Vec4::W,
        )
    }

    /// Right-handed rotation about Y.
    pub(crate) fn from_rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, 0.0, -s, 0.0),
            Vec4::Y,
            Vec4::new(s, 0.0, c, 0.0),
            Vec4::W,
        )
    }

    /// Right-handed rotation about Z.
    pub(crate) fn from_rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_cols(
            Vec4::new(c, s, 0.0, 0.0),
            Vec4::new(-s, c, 0.0, 0.0),
            Vec4::Z,
            Vec4::W,
        )
    }

    pub(crate) fn transpose(&self) -> Self {
        Self::from_cols(
            self.get_row(0),
            self.get_row(1),
            self.get_row(2),
            self.get_row(3),
        )
    }

    fn mul_mat(self, rhs: Mat4) -> Self {
        Self::from_cols(
            self * rhs.cols[0],
            self * rhs.cols[1],
            self * rhs.cols[2],
            self * rhs.cols[3],
        )
    }
}

impl AbsDiffEq for Mat4 {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl RelativeEq for Mat4 {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.cols
            .iter()
            .zip(other.cols.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

// --- Tests ---
