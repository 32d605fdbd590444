//! Wow and flutter pitch modulation.
//!
//! Two irregular oscillators sweep the read position of a per-channel
//! [`ModulationDelay`] around a fixed 10 ms base delay. Pitch follows the rate
//! of change of the delay, so a slow, wide sweep (wow) and a fast, narrow one
//! (flutter) stack into the familiar transport wobble.
//!
//! Each oscillator is not a pure sine: a second partial at 1.7× (wow) or
//! 2.3× (flutter) the phase is mixed in with a small random weight, and that
//! weight drifts by 1% toward a fresh draw every 1000 frames.
//!
//! # Frame protocol
//!
//! ```text
//! begin_frame(noise)            advance phases, maybe drift, resolve the tap
//! process(ch, x) for each ch    write x at the cursor, read back at the tap
//! end_frame()                   advance the shared cursor
//! ```
//!
//! Every channel writes on every frame, including while modulation is off,
//! so turning wow or flutter on never replays stale audio.

use core::f32::consts::TAU;

use libm::{floorf, sinf};
use rand::RngCore;
use tapewarm_core::{DelayTap, ModulationDelay, NoiseSource, ms_to_samples};

use crate::coefficients::{
    OscillatorCoefficients, TapeCoefficients, flutter_depth_ms, wow_depth_ms,
};

/// Center of the modulated delay.
pub const BASE_DELAY_MS: f32 = 10.0;
/// Delay buffer length.
pub const DELAY_BUFFER_SECONDS: f32 = 0.05;
/// Frames between irregularity-offset drifts.
pub const DRIFT_INTERVAL: u32 = 1000;
/// Phase multiplier of the wow oscillator's second partial.
pub const WOW_IRREGULARITY: f32 = 1.7;
/// Phase multiplier of the flutter oscillator's second partial.
pub const FLUTTER_IRREGULARITY: f32 = 2.3;

/// Irregular low-frequency oscillator with phase in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    phase: f32,
    increment: f32,
    offset: f32,
    irregularity: f32,
}

impl Oscillator {
    /// Stalled oscillator with the given second-partial multiplier.
    pub const fn new(irregularity: f32) -> Self {
        Self {
            phase: 0.0,
            increment: 0.0,
            offset: 0.0,
            irregularity,
        }
    }

    /// Starts a new generation: rate and offset from `coeffs`, phase kept.
    pub fn retune(&mut self, coeffs: &OscillatorCoefficients) {
        self.increment = coeffs.phase_increment;
        self.offset = coeffs.offset;
    }

    /// Steps the phase, wrapping at 1.
    #[inline]
    pub fn advance(&mut self) {
        self.phase += self.increment;
        if self.phase >= 1.0 {
            self.phase -= floorf(self.phase);
        }
    }

    /// `sin(2π·φ) + offset · sin(k · 2π·φ)`.
    #[inline]
    pub fn value(&self) -> f32 {
        let angle = TAU * self.phase;
        sinf(angle) + self.offset * sinf(self.irregularity * angle)
    }

    /// Blends the offset 99% old / 1% `draw`.
    #[inline]
    pub fn drift(&mut self, draw: f32) {
        self.offset = self.offset * 0.99 + draw * 0.01;
    }

    /// Current phase.
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Current irregularity offset.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Phase step per sample.
    pub fn increment(&self) -> f32 {
        self.increment
    }

    fn reset_phase(&mut self) {
        self.phase = 0.0;
    }
}

/// Where the current frame reads from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadProbe {
    /// Write cursor at the time of the read.
    pub cursor: usize,
    /// Delay requested by the oscillators, before clamping.
    pub delay_samples: f32,
    /// Resolved interpolation slots.
    pub tap: DelayTap,
}

/// Pitch-modulation engine: oscillators plus delay buffers.
#[derive(Debug, Clone)]
pub struct WowFlutter {
    wow: Oscillator,
    flutter: Oscillator,
    delay: ModulationDelay,
    sample_rate: f32,
    wow_depth_ms: f32,
    flutter_depth_ms: f32,
    age_boost: f32,
    frames_until_drift: u32,
    probe: Option<ReadProbe>,
}

impl WowFlutter {
    /// Allocates `channels` buffers of [`DELAY_BUFFER_SECONDS`].
    pub fn new(channels: usize, sample_rate: f32) -> Self {
        Self {
            wow: Oscillator::new(WOW_IRREGULARITY),
            flutter: Oscillator::new(FLUTTER_IRREGULARITY),
            delay: ModulationDelay::from_time(channels, sample_rate, DELAY_BUFFER_SECONDS),
            sample_rate,
            wow_depth_ms: 0.0,
            flutter_depth_ms: 0.0,
            age_boost: 1.0,
            frames_until_drift: 0,
            probe: None,
        }
    }

    /// Reallocates the buffers for a new sample rate and clears all state.
    pub fn prepare(&mut self, channels: usize, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.delay = ModulationDelay::from_time(channels, sample_rate, DELAY_BUFFER_SECONDS);
        self.reset();
    }

    /// Installs new oscillator generations.
    pub fn retune(&mut self, coeffs: &TapeCoefficients) {
        self.wow.retune(&coeffs.wow);
        self.flutter.retune(&coeffs.flutter);
    }

    /// Sets wow depth from a percentage.
    pub fn set_wow(&mut self, percent: f32) {
        self.wow_depth_ms = wow_depth_ms(percent);
    }

    /// Sets flutter depth from a percentage.
    pub fn set_flutter(&mut self, percent: f32) {
        self.flutter_depth_ms = flutter_depth_ms(percent);
    }

    /// Age widens the sweep by up to 50%; rates are untouched.
    pub fn set_age(&mut self, percent: f32) {
        self.age_boost = 1.0 + percent / 100.0 * 0.5;
    }

    /// Whether either oscillator has depth.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.wow_depth_ms > 0.0 || self.flutter_depth_ms > 0.0
    }

    /// Current delay offset from the base, in ms.
    #[inline]
    pub fn modulation_ms(&self) -> f32 {
        (self.wow.value() * self.wow_depth_ms + self.flutter.value() * self.flutter_depth_ms)
            * self.age_boost
    }

    /// Starts a frame: advances both oscillators, drifts their offsets every
    /// [`DRIFT_INTERVAL`] frames, and resolves this frame's read tap.
    #[inline]
    pub fn begin_frame<R: RngCore>(&mut self, noise: &mut NoiseSource<R>) {
        self.wow.advance();
        self.flutter.advance();

        if self.frames_until_drift == 0 {
            self.wow.drift(noise.next_sample());
            self.flutter.drift(noise.next_sample());
            self.frames_until_drift = DRIFT_INTERVAL;
        }
        self.frames_until_drift -= 1;

        self.probe = if self.is_active() {
            let delay_samples =
                ms_to_samples(BASE_DELAY_MS + self.modulation_ms(), self.sample_rate);
            Some(ReadProbe {
                cursor: self.delay.write_position(),
                delay_samples,
                tap: self.delay.tap(delay_samples),
            })
        } else {
            None
        };
    }

    /// Writes `input` for `channel` and returns the modulated read, or
    /// `input` itself while modulation is off.
    #[inline]
    pub fn process(&mut self, channel: usize, input: f32) -> f32 {
        self.delay.write(channel, input);
        match self.probe {
            Some(probe) => self.delay.read_tap(channel, probe.tap),
            None => input,
        }
    }

    /// Finishes a frame by advancing the shared write cursor.
    #[inline]
    pub fn end_frame(&mut self) {
        self.delay.advance();
    }

    /// Read position of the most recent frame, if modulation was active.
    pub fn last_read(&self) -> Option<ReadProbe> {
        self.probe
    }

    /// The delay buffers.
    pub fn delay(&self) -> &ModulationDelay {
        &self.delay
    }

    /// The wow oscillator.
    pub fn wow(&self) -> &Oscillator {
        &self.wow
    }

    /// The flutter oscillator.
    pub fn flutter(&self) -> &Oscillator {
        &self.flutter
    }

    /// Zeroes the buffers, phases and drift counter; depths and offsets stay.
    pub fn reset(&mut self) {
        self.delay.clear();
        self.wow.reset_phase();
        self.flutter.reset_phase();
        self.frames_until_drift = 0;
        self.probe = None;
    }
}
