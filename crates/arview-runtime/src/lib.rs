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

//! # arview Runtime
//!
//! Runs a [`TrackingSource`](arview_core::TrackingSource) on a background
//! thread and hands one [`FrameUpdate`] per processed frame to the thread
//! that owns the presentation surface.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod session;
pub mod sim;

pub use config::SessionConfig;
pub use error::{ConfigError, SessionError};
pub use session::{FrameUpdate, TrackingSession};
pub use sim::SimulatedSource;
