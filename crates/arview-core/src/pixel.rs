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

//! Video frame conversion from the engine's packed 32-bit pixels to the
//! byte-ordered BGRA layout expected by presentation surfaces.

use crate::error::PixelError;

/// Bytes per converted pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Size in bytes of a converted frame.
#[inline]
pub fn bgra_buffer_len(width: usize, height: usize) -> usize {
    width * height * BYTES_PER_PIXEL
}

/// Converts packed 32-bit engine pixels into 4-byte output pixels.
///
/// For each pixel `p` the output bytes are `(p >> 16)`, `(p >> 8)`, `p` and
/// `(p >> 24)`, each masked to 8 bits.
///
/// # Errors
///
/// Returns [`PixelError::LengthMismatch`] unless `dst` holds exactly four
/// bytes per source pixel.
pub fn packed_to_bgra(src: &[u32], dst: &mut [u8]) -> Result<(), PixelError> {
    let expected = src.len() * BYTES_PER_PIXEL;
    if dst.len() != expected {
        return Err(PixelError::LengthMismatch {
            expected,
            actual: dst.len(),
        });
    }

    for (p, out) in src.iter().zip(dst.chunks_exact_mut(BYTES_PER_PIXEL)) {
        out[0] = (p >> 16) as u8;
        out[1] = (p >> 8) as u8;
        out[2] = *p as u8;
        out[3] = (p >> 24) as u8;
    }
    Ok(())
}
