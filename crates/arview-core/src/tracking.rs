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

//! Data contracts between the external tracking engine and the math core.
//!
//! The engine itself (marker detection, calibration, video capture) lives
//! outside this crate. It is reached through [`TrackingSource`], which exposes
//! exactly the calls a per-frame update needs.

use serde::{Deserialize, Serialize};

use crate::error::TrackingError;
use crate::math::Mat4;

/// Confidence reported when the source gave none.
pub const NO_CONFIDENCE: f32 = -1.0;

/// The pose of a single marker for one frame, as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerPose {
    /// Identifier returned when the marker was registered.
    pub marker_id: i32,
    /// Whether the marker was detected in this frame.
    pub visible: bool,
    /// Detection confidence, or [`NO_CONFIDENCE`].
    pub confidence: f32,
    /// Model-view matrix in row-major order (row-vector convention).
    pub model_view: [f32; 16],
}

impl MarkerPose {
    /// A pose for a marker that was not seen this frame.
    pub fn hidden(marker_id: i32) -> Self {
        Self {
            marker_id,
            visible: false,
            confidence: NO_CONFIDENCE,
            model_view: Mat4::IDENTITY.to_row_major_f32(),
        }
    }

    /// The model-view buffer as a [`Mat4`].
    pub fn model_view_matrix(&self) -> Mat4 {
        Mat4::from_row_major(self.model_view)
    }
}

/// Everything the engine reported for one processed frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingFrame {
    /// Monotonic index of the processed frame, starting at 0.
    pub frame_index: u64,
    /// Camera projection matrix in row-major order.
    pub projection: [f32; 16],
    /// Poses of every queried marker.
    pub markers: Vec<MarkerPose>,
}

impl TrackingFrame {
    /// Looks up the pose of a marker by id.
    pub fn marker(&self, marker_id: i32) -> Option<&MarkerPose> {
        self.markers.iter().find(|m| m.marker_id == marker_id)
    }

    /// The projection buffer as a [`Mat4`].
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::from_row_major(self.projection)
    }
}

/// A tracking engine feeding the math core.
///
/// Calls happen from a single processing thread in the order
/// `capture` → `update` → `projection_matrix` / `query_marker`.
pub trait TrackingSource: Send {
    /// Grabs the next video frame. Returns `Ok(false)` if no new frame is ready yet.
    fn capture(&mut self) -> Result<bool, TrackingError>;

    /// Runs marker detection and pose estimation on the captured frame.
    fn update(&mut self) -> Result<(), TrackingError>;

    /// The current camera projection matrix, row-major.
    fn projection_matrix(&self) -> [f32; 16];

    /// The pose of a registered marker for the last updated frame.
    fn query_marker(&self, marker_id: i32) -> Result<MarkerPose, TrackingError>;
}

/// Formats a pose for on-screen debugging.
///
/// The first line names the marker and its confidence, the following four
/// lines print the model-view buffer column by column.
pub fn marker_debug_text(pose: &MarkerPose) -> String {
    let m = &pose.model_view;
    let mut text = format!("Marker: {} Confidence: {:.2}", pose.marker_id, pose.confidence);
    for i in 0..4 {
        text.push_str(&format!(
            "\n{:7.2} {:7.2} {:7.2} {:7.2}",
            m[i],
            m[i + 4],
            m[i + 8],
            m[i + 12]
        ));
    }
    text
}
