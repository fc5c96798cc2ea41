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

//! # arview Core
//!
//! Matrix math and data contracts used to pin a planar UI element onto a
//! marker reported by an external tracking engine.
//!
//! The [`math`] module is the heart of the crate: it builds and composes 4x4
//! transforms using the row-vector convention (`p' = p * M`). The remaining
//! modules describe what a tracking engine hands over each frame and how that
//! data becomes a single screen-space transform.

#![warn(missing_docs)]

pub mod error;
pub mod math;
pub mod pixel;
pub mod placement;
pub mod tracking;

pub use error::{MathError, PixelError, TrackingError};
pub use math::{Mat4, Vec3, Vec4};
pub use placement::{ElementPlacement, Viewport};
pub use tracking::{MarkerPose, TrackingFrame, TrackingSource};
