//! Peak telemetry.
//!
//! [`LevelMeter`] is written by the audio side once per block and read by any
//! number of observers. The two cells are independent: a reader may see the
//! input peak of one block next to the output peak of the previous one.
//!
//! [`PeakFollower`] turns the raw block peaks into a meter-friendly level with
//! instant attack and exponential release, for observers that redraw slower
//! than the block rate.

use core::sync::atomic::{AtomicU32, Ordering};

use libm::powf;
use tapewarm_core::{linear_to_db, time_constant_coeff};

/// Input and output block peaks as atomic `f32` bits.
#[derive(Debug, Default)]
pub struct LevelMeter {
    input: AtomicU32,
    output: AtomicU32,
}

impl LevelMeter {
    /// Meter reading silence.
    pub const fn new() -> Self {
        Self {
            input: AtomicU32::new(0),
            output: AtomicU32::new(0),
        }
    }

    /// Publishes one block's peaks.
    #[inline]
    pub fn publish(&self, input_peak: f32, output_peak: f32) {
        self.input.store(input_peak.to_bits(), Ordering::Release);
        self.output.store(output_peak.to_bits(), Ordering::Release);
    }

    /// Peak magnitude of the last block's input.
    #[inline]
    pub fn input_level(&self) -> f32 {
        f32::from_bits(self.input.load(Ordering::Acquire))
    }

    /// Peak magnitude of the last block's output.
    #[inline]
    pub fn output_level(&self) -> f32 {
        f32::from_bits(self.output.load(Ordering::Acquire))
    }

    /// Back to silence.
    pub fn reset(&self) {
        self.publish(0.0, 0.0);
    }
}

/// Largest magnitude in the first `frames` samples of every channel.
#[inline]
pub fn block_peak(channels: &[&mut [f32]], frames: usize) -> f32 {
    channels
        .iter()
        .flat_map(|ch| ch.iter().take(frames))
        .fold(0.0_f32, |peak, &s| peak.max(s.abs()))
}

/// Instant-attack, exponential-release envelope over block peaks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakFollower {
    level: f32,
    release_coeff: f32,
}

impl PeakFollower {
    /// Follower releasing with a `release_ms` time constant at `sample_rate`.
    pub fn new(sample_rate: f32, release_ms: f32) -> Self {
        Self {
            level: 0.0,
            release_coeff: time_constant_coeff(sample_rate, release_ms),
        }
    }

    /// Feeds one block's peak and returns the smoothed level.
    pub fn update(&mut self, peak: f32, block_len: usize) -> f32 {
        if peak >= self.level {
            self.level = peak;
        } else {
            let retain = powf(1.0 - self.release_coeff, block_len as f32);
            self.level = peak + (self.level - peak) * retain;
        }
        self.level
    }

    /// Smoothed linear level.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Smoothed level in dB.
    pub fn level_db(&self) -> f32 {
        linear_to_db(self.level)
    }

    /// Drops straight to silence.
    pub fn reset(&mut self) {
        self.level = 0.0;
    }
}
