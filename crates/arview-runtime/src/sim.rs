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

//! A deterministic tracking source for demos and tests.

use arview_core::math::{to_radians, Mat4};
use arview_core::{MarkerPose, MathError, TrackingError, TrackingSource};

use crate::config::SessionConfig;

const VERTICAL_FOV_DEGREES: f64 = 45.0;
const SWAY_AMPLITUDE: f64 = 0.5;

/// A [`TrackingSource`] that reports a single marker swaying about the
/// camera's y-axis at a fixed distance.
///
/// Every frame is immediately available, so `capture` always succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    marker_id: i32,
    projection: [f32; 16],
    distance: f64,
    orbit_step: f64,
    hidden_every: u64,
    fail_at: Option<u64>,
    frames_updated: u64,
    captured: bool,
    pose: MarkerPose,
}

impl SimulatedSource {
    /// Creates a source whose projection matches the configured camera.
    pub fn new(config: &SessionConfig) -> Result<Self, MathError> {
        let projection = Mat4::perspective_fov_lh(
            to_radians(VERTICAL_FOV_DEGREES),
            config.video_aspect_ratio(),
            config.near_plane,
            config.far_plane,
        )?;
        Ok(Self {
            marker_id: config.marker_id,
            projection: projection.to_row_major_f32(),
            distance: (config.near_plane + config.far_plane) * 0.3,
            orbit_step: 0.05,
            hidden_every: 0,
            fail_at: None,
            frames_updated: 0,
            captured: false,
            pose: MarkerPose::hidden(config.marker_id),
        })
    }

    /// Sets the marker's distance from the camera.
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Sets the sway advance per frame, in radians.
    pub fn with_orbit_step(mut self, radians: f64) -> Self {
        self.orbit_step = radians;
        self
    }

    /// Hides the marker on every `n`-th frame. `0` keeps it always visible.
    pub fn with_hidden_every(mut self, n: u64) -> Self {
        self.hidden_every = n;
        self
    }

    /// Makes `update` fail on the given zero-based frame.
    pub fn with_failure_at(mut self, frame: u64) -> Self {
        self.fail_at = Some(frame);
        self
    }

    /// Number of frames successfully updated so far.
    pub fn frames_updated(&self) -> u64 {
        self.frames_updated
    }

    fn pose_for(&self, index: u64) -> MarkerPose {
        if self.hidden_every > 0 && (index + 1) % self.hidden_every == 0 {
            return MarkerPose::hidden(self.marker_id);
        }
        let t = index as f64;
        let yaw = SWAY_AMPLITUDE * (t * self.orbit_step).sin();
        let model_view = Mat4::translation(0.0, 0.0, self.distance) * Mat4::rotation_y(yaw);
        MarkerPose {
            marker_id: self.marker_id,
            visible: true,
            confidence: (0.75 + 0.25 * (t * 0.1).cos()) as f32,
            model_view: model_view.to_row_major_f32(),
        }
    }
}

impl TrackingSource for SimulatedSource {
    fn capture(&mut self) -> Result<bool, TrackingError> {
        self.captured = true;
        Ok(true)
    }

    fn update(&mut self) -> Result<(), TrackingError> {
        if !self.captured {
            return Err(TrackingError::Update("no frame captured".to_string()));
        }
        self.captured = false;
        let index = self.frames_updated;
        if self.fail_at == Some(index) {
            return Err(TrackingError::Update(format!("simulated failure at frame {index}")));
        }
        self.pose = self.pose_for(index);
        self.frames_updated += 1;
        log::trace!("Simulated frame {index} updated");
        Ok(())
    }

    fn projection_matrix(&self) -> [f32; 16] {
        self.projection
    }

    fn query_marker(&self, marker_id: i32) -> Result<MarkerPose, TrackingError> {
        if marker_id != self.marker_id {
            return Err(TrackingError::UnknownMarker(marker_id));
        }
        Ok(self.pose)
    }
}
