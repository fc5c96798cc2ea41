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

//! Session configuration, loaded from JSON.

use std::path::Path;

use arview_core::{ElementPlacement, Viewport};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Largest accepted video width or height, in pixels.
pub const MAX_VIDEO_DIMENSION: u32 = 8192;

/// Everything a [`TrackingSession`](crate::TrackingSession) needs to turn
/// tracking results into screen transforms.
///
/// Missing fields take their [`Default`] values, so a config file only has
/// to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Identifier of the marker the element follows.
    pub marker_id: i32,
    /// Near clipping plane of the camera projection.
    pub near_plane: f64,
    /// Far clipping plane of the camera projection.
    pub far_plane: f64,
    /// Requested capture width in pixels.
    pub video_width: u32,
    /// Requested capture height in pixels.
    pub video_height: u32,
    /// Width of the presentation surface in pixels.
    pub viewport_width: f64,
    /// Height of the presentation surface in pixels.
    pub viewport_height: f64,
    /// Width of the pinned element in pixels.
    pub element_width: f64,
    /// Height of the pinned element in pixels.
    pub element_height: f64,
    /// Pixel-to-marker scale applied to the element.
    pub element_scale: f64,
    /// Whether the element spins about the marker normal.
    pub rotate: bool,
    /// Spin per processed frame, in radians.
    pub rotation_step: f64,
    /// Capacity of the frame hand-off channel.
    pub channel_capacity: usize,
    /// Sleep between capture attempts when no frame is ready, in milliseconds.
    pub idle_backoff_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            marker_id: 0,
            near_plane: 40.0,
            far_plane: 1000.0,
            video_width: 640,
            video_height: 480,
            viewport_width: 640.0,
            viewport_height: 480.0,
            element_width: 200.0,
            element_height: 120.0,
            element_scale: 0.5,
            rotate: false,
            rotation_step: 0.05,
            channel_capacity: 1,
            idle_backoff_ms: 1,
        }
    }
}

impl SessionConfig {
    /// Load a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::debug!("Loaded session config from '{}'", path.display());
        Self::from_json(&content)
    }

    /// Save the configuration to a JSON file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Checks every field the session depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.near_plane.is_finite() && self.near_plane > 0.0) {
            return Err(invalid("near_plane", "must be positive and finite"));
        }
        if !(self.far_plane.is_finite() && self.far_plane > self.near_plane) {
            return Err(invalid("far_plane", "must be finite and greater than near_plane"));
        }
        if self.video_width == 0 || self.video_height == 0 {
            return Err(invalid("video_width", "video size must be non-zero"));
        }
        if self.video_width > MAX_VIDEO_DIMENSION || self.video_height > MAX_VIDEO_DIMENSION {
            return Err(invalid(
                "video_width",
                format!("video size must not exceed {MAX_VIDEO_DIMENSION} pixels per side"),
            ));
        }
        if let Err(e) = self.viewport() {
            return Err(invalid("viewport_width", e.to_string()));
        }
        for (field, value) in [
            ("element_width", self.element_width),
            ("element_height", self.element_height),
            ("element_scale", self.element_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, "must be positive and finite"));
            }
        }
        if !self.rotation_step.is_finite() {
            return Err(invalid("rotation_step", "must be finite"));
        }
        if self.channel_capacity == 0 {
            return Err(invalid("channel_capacity", "must be at least 1"));
        }
        Ok(())
    }

    /// The presentation surface size.
    pub fn viewport(&self) -> Result<Viewport, arview_core::MathError> {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// The element layout with no rotation applied yet.
    pub fn placement(&self) -> ElementPlacement {
        ElementPlacement::new(self.element_width, self.element_height).with_scale(self.element_scale)
    }

    /// Width divided by height of the captured video.
    pub fn video_aspect_ratio(&self) -> f64 {
        f64::from(self.video_width) / f64::from(self.video_height)
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
