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

//! The background tracking loop and its frame hand-off.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use arview_core::{Mat4, MarkerPose, TrackingFrame, TrackingSource};

use crate::config::SessionConfig;
use crate::error::SessionError;

const WORKER_NAME: &str = "arview-tracking";
const SEND_POLL: Duration = Duration::from_millis(10);

/// The result of processing one video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUpdate {
    /// Everything the source reported for this frame.
    pub frame: TrackingFrame,
    /// Rotation applied to the element, in radians.
    pub rotation_z: f64,
    /// The element transform, or `None` when the marker is hidden.
    pub transform: Option<Mat4>,
}

impl FrameUpdate {
    /// Index of the processed frame, starting at 0.
    pub fn frame_index(&self) -> u64 {
        self.frame.frame_index
    }

    /// The pose of the followed marker.
    pub fn pose(&self) -> Option<&MarkerPose> {
        self.frame.markers.first()
    }
}

/// Drives a [`TrackingSource`] on a dedicated thread.
///
/// The worker runs `capture → update → query → place` and blocks on the
/// hand-off channel until the consumer takes the frame, so at most
/// `channel_capacity` frames are in flight. Dropping the session stops the
/// worker and waits for it.
#[derive(Debug)]
pub struct TrackingSession {
    receiver: flume::Receiver<FrameUpdate>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<Result<u64, SessionError>>>,
}

impl TrackingSession {
    /// Validates `config` and starts processing frames from `source`.
    pub fn start<S>(source: S, config: SessionConfig) -> Result<Self, SessionError>
    where
        S: TrackingSource + 'static,
    {
        config.validate()?;
        let (sender, receiver) = flume::bounded(config.channel_capacity);
        let running = Arc::new(AtomicBool::new(true));
        let marker_id = config.marker_id;

        let flag = Arc::clone(&running);
        let worker = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || {
                let result = run_worker(source, &config, &flag, &sender);
                flag.store(false, Ordering::Release);
                if let Err(e) = &result {
                    log::error!("Tracking loop failed: {e}");
                }
                result
            })
            .map_err(SessionError::Spawn)?;

        log::info!("Tracking session started for marker {marker_id}.");
        Ok(Self {
            receiver,
            running,
            worker: Some(worker),
        })
    }

    /// Whether the worker is still processing frames.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Waits up to `timeout` for the next frame.
    ///
    /// Returns [`SessionError::Disconnected`] once the worker has stopped and
    /// every queued frame was taken; call [`stop`](Self::stop) to learn why.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<FrameUpdate, SessionError> {
        self.receiver.recv_timeout(timeout).map_err(|e| match e {
            flume::RecvTimeoutError::Timeout => SessionError::Timeout,
            flume::RecvTimeoutError::Disconnected => SessionError::Disconnected,
        })
    }

    /// Drains every queued frame and returns the newest one, if any.
    pub fn try_latest(&self) -> Option<FrameUpdate> {
        self.receiver.try_iter().last()
    }

    /// Stops the worker, waits for it, and returns how many frames it processed.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the worker early, or
    /// [`SessionError::WorkerPanicked`].
    pub fn stop(mut self) -> Result<u64, SessionError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<u64, SessionError> {
        self.running.store(false, Ordering::Release);
        let Some(worker) = self.worker.take() else {
            return Ok(0);
        };
        let frames = worker.join().map_err(|_| SessionError::WorkerPanicked)??;
        log::info!("Tracking session stopped after {frames} frames.");
        Ok(frames)
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::warn!("Tracking session ended with an error: {e}");
        }
    }
}

fn run_worker<S: TrackingSource>(
    mut source: S,
    config: &SessionConfig,
    running: &AtomicBool,
    sender: &flume::Sender<FrameUpdate>,
) -> Result<u64, SessionError> {
    let viewport = config.viewport()?;
    let placement = config.placement();
    let backoff = Duration::from_millis(config.idle_backoff_ms);
    let mut rotation_z = 0.0;
    let mut frame_index = 0u64;

    while running.load(Ordering::Acquire) {
        if !source.capture()? {
            thread::sleep(backoff);
            continue;
        }
        source.update()?;
        let projection = source.projection_matrix();
        let pose = source.query_marker(config.marker_id)?;

        // The element only spins while it is on screen.
        if config.rotate && pose.visible {
            rotation_z += config.rotation_step;
        }
        let transform = placement
            .with_rotation(rotation_z)
            .place(&pose, &projection, viewport)?;

        let update = FrameUpdate {
            frame: TrackingFrame {
                frame_index,
                projection,
                markers: vec![pose],
            },
            rotation_z,
            transform,
        };
        if !hand_off(sender, update, running) {
            break;
        }
        frame_index += 1;
    }
    Ok(frame_index)
}

/// Sends one frame, waiting while the channel is full.
///
/// Returns `false` if the session was cancelled or the consumer went away.
fn hand_off(sender: &flume::Sender<FrameUpdate>, update: FrameUpdate, running: &AtomicBool) -> bool {
    let mut pending = update;
    loop {
        match sender.send_timeout(pending, SEND_POLL) {
            Ok(()) => return true,
            Err(flume::SendTimeoutError::Timeout(update)) => {
                if !running.load(Ordering::Acquire) {
                    return false;
                }
                pending = update;
            }
            Err(flume::SendTimeoutError::Disconnected(_)) => {
                log::debug!("Frame consumer disconnected.");
                return false;
            }
        }
    }
}
