//! Multichannel fractional delay line for pitch modulation.
//!
//! One circular buffer per channel, all sharing a single write cursor. Each
//! frame, every channel writes its sample at the cursor, reads back at a
//! fractional offset behind it, and the cursor then advances one slot.
//!
//! # Read invariants
//!
//! - The requested delay is clamped to `[1, len - 2]` samples before any index
//!   is formed, whatever the caller's modulation produced (including NaN).
//! - Both interpolation indices lie in `[0, len)`.
//! - Reads never touch the slot after the cursor, which holds the oldest
//!   sample and is the next to be overwritten.
//!
//! # Example
//!
//! ```rust
//! use tapewarm_core::ModulationDelay;
//!
//! // 50 ms stereo buffer at 48 kHz
//! let mut delay = ModulationDelay::from_time(2, 48000.0, 0.05);
//! delay.write(0, 1.0);
//! delay.write(1, -1.0);
//! let tap = delay.tap(10.5);
//! let left = delay.read_tap(0, tap);
//! delay.advance();
//! # assert!(left.is_finite());
//! ```

use alloc::vec;
use alloc::vec::Vec;

/// Smallest buffer that still leaves a valid `[1, len - 2]` delay range.
pub const MIN_DELAY_LEN: usize = 4;

/// Resolved read position: two neighbouring slots and the blend between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayTap {
    /// Older of the two slots.
    pub index0: usize,
    /// Newer slot, `(index0 + 1) % len`.
    pub index1: usize,
    /// Weight of `index1` in [0, 1).
    pub frac: f32,
}

/// Circular buffers with one shared write cursor (heap-allocated once).
///
/// # Memory
///
/// Buffers are allocated by [`ModulationDelay::new`] and never reallocate;
/// [`ModulationDelay::clear`] zeroes them in place.
#[derive(Debug, Clone)]
pub struct ModulationDelay {
    buffers: Vec<Vec<f32>>,
    len: usize,
    write_pos: usize,
}

impl ModulationDelay {
    /// Creates `channels` buffers of `len` samples (at least [`MIN_DELAY_LEN`]).
    pub fn new(channels: usize, len: usize) -> Self {
        let len = len.max(MIN_DELAY_LEN);

        #[cfg(feature = "tracing")]
        tracing::debug!(channels, len, "modulation delay allocated");

        Self {
            buffers: vec![vec![0.0; len]; channels],
            len,
            write_pos: 0,
        }
    }

    /// Creates buffers holding `max_seconds` of audio at `sample_rate`.
    ///
    /// Non-positive or non-finite input yields the minimum length.
    pub fn from_time(channels: usize, sample_rate: f32, max_seconds: f32) -> Self {
        let samples = sample_rate * max_seconds;
        let len = if samples.is_finite() && samples > 0.0 {
            samples as usize
        } else {
            0
        };
        Self::new(channels, len)
    }

    /// Buffer length in samples (per channel).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: buffers hold at least [`MIN_DELAY_LEN`] samples.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of channel buffers.
    pub fn channels(&self) -> usize {
        self.buffers.len()
    }

    /// Current write cursor.
    pub fn write_position(&self) -> usize {
        self.write_pos
    }

    /// Longest readable delay in samples.
    pub fn max_delay(&self) -> f32 {
        (self.len - 2) as f32
    }

    /// Writes `sample` into `channel` at the shared cursor.
    ///
    /// Out-of-range channels are ignored.
    #[inline]
    pub fn write(&mut self, channel: usize, sample: f32) {
        if let Some(buffer) = self.buffers.get_mut(channel) {
            buffer[self.write_pos] = sample;
        }
    }

    /// Resolves a fractional delay (in samples behind the cursor) to a tap.
    ///
    /// The delay is clamped to `[1, len - 2]`; NaN maps to 1.
    #[inline]
    pub fn tap(&self, delay_samples: f32) -> DelayTap {
        let delay = if delay_samples.is_nan() {
            1.0
        } else {
            delay_samples.clamp(1.0, self.max_delay())
        };

        let whole = delay as usize;
        let fractional = delay - whole as f32;

        // Position `write_pos - delay` lies between slot `write_pos - back`
        // and the slot after it.
        let (back, frac) = if fractional > 0.0 {
            (whole + 1, 1.0 - fractional)
        } else {
            (whole, 0.0)
        };

        let index0 = (self.write_pos + self.len - back) % self.len;
        let index1 = (index0 + 1) % self.len;

        DelayTap {
            index0,
            index1,
            frac,
        }
    }

    /// Reads `channel` at a resolved tap with linear interpolation.
    #[inline]
    pub fn read_tap(&self, channel: usize, tap: DelayTap) -> f32 {
        match self.buffers.get(channel) {
            Some(buffer) => {
                let a = buffer[tap.index0];
                let b = buffer[tap.index1];
                a + (b - a) * tap.frac
            }
            None => 0.0,
        }
    }

    /// Reads `channel` at a fractional delay behind the cursor.
    #[inline]
    pub fn read(&self, channel: usize, delay_samples: f32) -> f32 {
        self.read_tap(channel, self.tap(delay_samples))
    }

    /// Advances the shared cursor one slot, wrapping at the buffer end.
    #[inline]
    pub fn advance(&mut self) {
        self.write_pos = (self.write_pos + 1) % self.len;
    }

    /// Zeroes every buffer and rewinds the cursor without reallocating.
    pub fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.fill(0.0);
        }
        self.write_pos = 0;
    }
}
