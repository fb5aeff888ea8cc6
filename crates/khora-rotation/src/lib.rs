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

//! # Khora Rotation
//!
//! Quaternion value type used by transform and scene code to represent 3D rotations.
//!
//! The crate converts between rotation representations: axis-angle pairs, the
//! shortest arc between two vectors, 4x4 rotation matrices, and spherical linear
//! interpolation between two orientations. Every operation is a pure function of
//! its inputs, so values can be shared freely across threads.
//!
//! The core operations follow a "preconditions, not checks" contract: degenerate
//! inputs (zero-length axes, rotations at identity passed to the axis extractor)
//! produce NaN or infinite components rather than errors. Debug builds assert
//! these preconditions. The `try_*` variants validate them and return a
//! [`RotationError`] instead.

#![warn(missing_docs)]

pub mod error;
pub mod math;

pub use error::{RotationError, RotationResult};
pub use math::{Mat4, MatrixElements, Quaternion, Vec3, Vec4};
