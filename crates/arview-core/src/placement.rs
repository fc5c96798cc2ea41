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

//! Pins a planar UI element onto a tracked marker.
//!
//! The element is laid out in pixels with its origin at the top-left corner.
//! [`ElementPlacement::world_matrix`] moves its centre to the marker origin,
//! flips y (pixel y grows down, marker y grows up) and scales it into marker
//! units; the marker pose, the camera projection and the viewport then carry
//! it to the screen.

use serde::{Deserialize, Serialize};

use crate::error::MathError;
use crate::math::{Mat4, Vec3, Vec4};
use crate::tracking::MarkerPose;

/// The pixel size of the surface the element is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport, rejecting empty or non-finite sizes.
    pub fn new(width: f64, height: f64) -> Result<Self, MathError> {
        // Builds the transform once to run the same validation.
        Mat4::viewport_transformation(width, height)?;
        Ok(Self { width, height })
    }

    /// The matrix mapping normalized device coordinates onto this viewport.
    pub fn matrix(&self) -> Result<Mat4, MathError> {
        Mat4::viewport_transformation(self.width, self.height)
    }
}

/// Layout of a planar element relative to the marker it follows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementPlacement {
    /// Element width in pixels.
    pub width: f64,
    /// Element height in pixels.
    pub height: f64,
    /// Pixels to marker units.
    pub scale: f64,
    /// In-plane rotation about the marker normal, in radians.
    pub rotation_z: f64,
}

impl Default for ElementPlacement {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            scale: 0.5,
            rotation_z: 0.0,
        }
    }
}

impl ElementPlacement {
    /// Creates a placement for an element of the given pixel size.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Sets the in-plane rotation.
    pub fn with_rotation(mut self, radians: f64) -> Self {
        self.rotation_z = radians;
        self
    }

    /// Sets the pixel-to-marker scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Element space to marker space: centre, rotate, then flip y and scale.
    pub fn world_matrix(&self) -> Mat4 {
        let center_at_origin = Mat4::translation(-self.width * 0.5, -self.height * 0.5, 0.0);
        let rotate = Mat4::rotation_z(self.rotation_z);
        let scale = Mat4::scale(self.scale, -self.scale, self.scale);
        center_at_origin * rotate * scale
    }

    /// Computes the screen-space transform for one frame.
    ///
    /// Returns `Ok(None)` when the marker is not visible, in which case the
    /// element should be hidden.
    ///
    /// # Errors
    ///
    /// Fails if the viewport is degenerate, or with [`MathError::NonFinite`]
    /// if a corrupt pose or projection buffer poisons the result.
    pub fn place(
        &self,
        pose: &MarkerPose,
        projection: &[f32; 16],
        viewport: Viewport,
    ) -> Result<Option<Mat4>, MathError> {
        if !pose.visible {
            return Ok(None);
        }
        let transform = Mat4::viewport_projection(
            self.world_matrix(),
            pose.model_view_matrix(),
            Mat4::from_row_major(*projection),
            viewport.matrix()?,
        );
        if !transform.is_finite() {
            log::warn!("Marker {} produced a non-finite transform", pose.marker_id);
            return Err(MathError::NonFinite);
        }
        Ok(Some(transform))
    }

    /// Maps a camera-space point back into element pixel coordinates.
    ///
    /// Only `world * model_view` is inverted; screen positions must be
    /// unprojected by the caller first.
    pub fn camera_to_element(&self, pose: &MarkerPose, camera_point: Vec3) -> Result<Vec3, MathError> {
        let inverse = (self.world_matrix() * pose.model_view_matrix()).affine_inverse()?;
        Ok(inverse.transform(Vec4::from_vec3(camera_point, 1.0)).truncate())
    }
}
