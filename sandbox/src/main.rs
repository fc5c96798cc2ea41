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

// arview Sandbox
// Pins an element to a simulated marker and logs its screen transform.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use arview_core::pixel::{bgra_buffer_len, packed_to_bgra};
use arview_core::tracking::marker_debug_text;
use arview_runtime::{SessionConfig, SimulatedSource, TrackingSession};
use clap::Parser;

const FRAME_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "sandbox")]
#[command(about = "Pins a UI element to a simulated marker and logs its screen transform")]
struct Args {
    /// JSON session config; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to process
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Spin the element about the marker normal
    #[arg(long)]
    rotate: bool,

    /// Hide the marker on every n-th frame (0 keeps it visible)
    #[arg(long, default_value_t = 30)]
    hidden_every: u64,
}

/// Fills a packed ARGB frame with a moving gradient in place of camera video.
fn fill_test_pattern(pixels: &mut [u32], frame_index: u64) {
    for (i, pixel) in pixels.iter_mut().enumerate() {
        let v = (i as u64).wrapping_add(frame_index) as u32 & 0xFF;
        *pixel = 0xFF00_0000 | (v << 16) | ((255 - v) << 8) | v;
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SessionConfig::from_file(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => SessionConfig::default(),
    };
    config.rotate |= args.rotate;

    let source = SimulatedSource::new(&config)?.with_hidden_every(args.hidden_every);
    let (width, height) = (config.video_width as usize, config.video_height as usize);
    let mut video = vec![0u32; width * height];
    let mut bgra = vec![0u8; bgra_buffer_len(width, height)];

    let session = TrackingSession::start(source, config)?;
    let mut visible = 0u64;
    for _ in 0..args.frames {
        let update = session.recv_timeout(FRAME_TIMEOUT)?;
        let index = update.frame_index();

        fill_test_pattern(&mut video, index);
        packed_to_bgra(&video, &mut bgra)?;

        match (update.pose(), update.transform) {
            (Some(pose), Some(transform)) => {
                visible += 1;
                log::debug!("{}", marker_debug_text(pose));
                log::debug!("Frame {index} transform:\n{}", transform.dump());
            }
            _ => log::debug!("Frame {index}: marker hidden"),
        }
    }

    let processed = session.stop()?;
    log::info!(
        "Processed {processed} frames; marker visible in {visible} of {} presented.",
        args.frames
    );
    Ok(())
}
