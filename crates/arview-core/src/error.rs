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

//! Defines the error types returned by the math, pixel and tracking modules.

use thiserror::Error;

/// An error raised when a transform cannot be built from the given arguments.
///
/// Every factory validates its inputs up front so that a NaN or infinite
/// matrix never reaches the presentation layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    /// A vector with (near) zero length was normalized.
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,
    /// The field of view is not inside the open interval `(0, PI)`.
    #[error("field of view must be in (0, PI) radians, got {0}")]
    InvalidFieldOfView(f64),
    /// The aspect ratio is zero, negative or not finite.
    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f64),
    /// A width, height or similar extent is zero, negative or not finite.
    #[error("{name} must be positive and finite, got {value}")]
    InvalidDimension {
        /// The name of the offending argument.
        name: &'static str,
        /// The value that was passed.
        value: f64,
    },
    /// The clipping planes are not ordered or not finite.
    #[error("invalid clip planes: near = {near}, far = {far}")]
    InvalidClipPlanes {
        /// The near plane.
        near: f64,
        /// The far plane.
        far: f64,
    },
    /// A flat matrix buffer did not contain the expected number of elements.
    #[error("expected {expected} matrix elements, got {actual}")]
    InvalidArrayLength {
        /// Required number of elements.
        expected: usize,
        /// Number of elements supplied.
        actual: usize,
    },
    /// The matrix has a projective fourth column and is not an affine transform.
    #[error("matrix is not affine (fourth column must be (0, 0, 0, 1))")]
    NotAffine,
    /// A composed transform contains `NaN` or infinite entries.
    #[error("transform contains non-finite values")]
    NonFinite,
    /// The matrix cannot be inverted.
    #[error("matrix is singular (determinant {determinant})")]
    SingularMatrix {
        /// The determinant that was found to be too close to zero.
        determinant: f64,
    },
}

/// An error raised while converting video frame buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PixelError {
    /// The destination buffer does not hold exactly four bytes per source pixel.
    #[error("destination holds {actual} bytes, expected {expected}")]
    LengthMismatch {
        /// Required destination length in bytes.
        expected: usize,
        /// Actual destination length in bytes.
        actual: usize,
    },
}

/// An error reported by a [`TrackingSource`](crate::tracking::TrackingSource).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrackingError {
    /// The source is not running (never started, or already shut down).
    #[error("tracking source is not running")]
    NotRunning,
    /// The requested marker was never registered with the source.
    #[error("unknown marker id {0}")]
    UnknownMarker(i32),
    /// Frame capture failed.
    #[error("frame capture failed: {0}")]
    Capture(String),
    /// The tracking update step failed.
    #[error("tracking update failed: {0}")]
    Update(String),
}
