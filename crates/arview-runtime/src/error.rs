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

//! Error types for configuration loading and the tracking session.

use arview_core::{MathError, TrackingError};
use thiserror::Error;

/// An error raised while loading, saving or validating a [`SessionConfig`](crate::SessionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration is not valid JSON for this schema.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the session cannot run with.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// An error raised by a [`TrackingSession`](crate::TrackingSession).
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The tracking source failed.
    #[error(transparent)]
    Tracking(#[from] TrackingError),
    /// A transform could not be computed.
    #[error(transparent)]
    Math(#[from] MathError),
    /// The worker thread could not be spawned.
    #[error("failed to spawn tracking thread: {0}")]
    Spawn(std::io::Error),
    /// The worker thread panicked.
    #[error("tracking thread panicked")]
    WorkerPanicked,
    /// No frame arrived within the requested time.
    #[error("timed out waiting for a frame")]
    Timeout,
    /// The worker has stopped and no more frames will arrive.
    #[error("tracking thread has stopped")]
    Disconnected,
}
