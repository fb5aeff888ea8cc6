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

//! Error types returned by the checked (`try_*`) rotation operations.

use thiserror::Error;

/// Result type used by the checked rotation operations.
pub type RotationResult<T> = Result<T, RotationError>;

/// A violated precondition of a rotation operation.
///
/// The unchecked operations never produce these; they let the resulting NaN or
/// infinity propagate instead.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RotationError {
    /// The rotation axis passed to an axis-angle constructor has zero length.
    #[error("rotation axis has zero length")]
    DegenerateAxis,

    /// One of the vectors passed to the vector-alignment constructor has zero length.
    #[error("cannot build a rotation arc from a zero-length vector")]
    ZeroLengthVector,

    /// The rotation is at (or too close to) identity for its axis to be recovered.
    #[error("rotation axis is undefined near identity (sin of half angle is {sin_half_angle})")]
    UndefinedAxis {
        /// Length of the quaternion's vector part.
        sin_half_angle: f32,
    },

    /// A quaternion expected to be unit length is not.
    #[error("quaternion is not unit length (squared magnitude is {magnitude_squared})")]
    NotNormalized {
        /// Squared magnitude of the offending quaternion.
        magnitude_squared: f32,
    },
}
