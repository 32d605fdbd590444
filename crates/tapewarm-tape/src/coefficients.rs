//! Parameter → coefficient mapping.
//!
//! Everything here runs when a control or the sample rate changes, never per
//! sample. Degenerate sample rates (zero, negative, non-finite) produce
//! identity coefficients: a pass-through head bump, a one-pole coefficient of
//! 1 and stalled oscillators.

use rand::RngCore;
use tapewarm_core::{
    BiquadCoefficients, NoiseSource, db_to_linear, map_range, one_pole_coeff,
    peaking_eq_coefficients,
};

use crate::params::{MachineSpeed, TapeFormulation, TapeParams};

/// Q of the head-bump peaking filter.
pub const HEAD_BUMP_Q: f32 = 1.5;
/// Head-bump gain at 100% amount, before the formulation factor.
pub const HEAD_BUMP_MAX_DB: f32 = 6.0;
/// Head-bump center frequency range after speed scaling.
pub const HEAD_BUMP_RANGE_HZ: (f32, f32) = (30.0, 200.0);
/// HF rolloff cutoff range.
pub const HF_CUTOFF_RANGE_HZ: (f32, f32) = (2000.0, 20_000.0);

/// Wow: base rate, rate jitter span and irregularity-offset span.
pub const WOW_RATE: OscillatorRange = OscillatorRange {
    base_hz: 0.5,
    jitter_hz: 0.5,
    offset_span: 0.2,
};
/// Flutter: base rate, rate jitter span and irregularity-offset span.
pub const FLUTTER_RATE: OscillatorRange = OscillatorRange {
    base_hz: 10.0,
    jitter_hz: 5.0,
    offset_span: 0.1,
};
/// Oscillator rates never drop below this, so jitter can't stall them.
pub const MIN_OSCILLATOR_RATE_HZ: f32 = 0.05;

/// Wow depth at 100%, in milliseconds of delay swing.
pub const WOW_MAX_DEPTH_MS: f32 = 3.0;
/// Flutter depth at 100%, in milliseconds of delay swing.
pub const FLUTTER_MAX_DEPTH_MS: f32 = 0.5;
/// Hiss floor at 1% and 100%.
pub const HISS_RANGE_DB: (f32, f32) = (-80.0, -30.0);

/// Random-draw window for one oscillator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorRange {
    /// Center rate in Hz.
    pub base_hz: f32,
    /// Rate jitter: `rate = base + draw * jitter`, `draw` in `[-1, 1]`.
    pub jitter_hz: f32,
    /// Initial irregularity offset: `draw * offset_span`.
    pub offset_span: f32,
}

/// One oscillator generation: rate, per-sample phase step, initial offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OscillatorCoefficients {
    /// Rate in Hz.
    pub rate_hz: f32,
    /// Phase step per sample, `rate / sample_rate`.
    pub phase_increment: f32,
    /// Irregularity offset at the start of the generation.
    pub offset: f32,
}

impl OscillatorCoefficients {
    /// Draws a new generation from `range` (two draws: rate, then offset).
    pub fn draw<R: RngCore>(
        range: &OscillatorRange,
        sample_rate: f32,
        noise: &mut NoiseSource<R>,
    ) -> Self {
        let rate_hz = (range.base_hz + noise.next_sample() * range.jitter_hz)
            .max(MIN_OSCILLATOR_RATE_HZ);
        let offset = noise.next_sample() * range.offset_span;
        Self {
            rate_hz,
            phase_increment: phase_increment(rate_hz, sample_rate),
            offset,
        }
    }
}

/// Derived constants shared by every channel.
#[derive(Debug, Clone, PartialEq)]
pub struct TapeCoefficients {
    /// Normalized head-bump peaking filter.
    pub head_bump: BiquadCoefficients,
    /// Head-bump center after speed scaling, in Hz.
    pub head_bump_freq_hz: f32,
    /// Head-bump gain in dB.
    pub head_bump_gain_db: f32,
    /// HF rolloff cutoff in Hz.
    pub hf_cutoff_hz: f32,
    /// One-pole coefficient per channel (left, right).
    pub hf_rolloff: [f32; 2],
    /// Wow oscillator generation.
    pub wow: OscillatorCoefficients,
    /// Flutter oscillator generation.
    pub flutter: OscillatorCoefficients,
}

impl TapeCoefficients {
    /// Pass-through filters and stalled oscillators.
    pub const fn identity() -> Self {
        Self {
            head_bump: BiquadCoefficients::IDENTITY,
            head_bump_freq_hz: 0.0,
            head_bump_gain_db: 0.0,
            hf_cutoff_hz: 0.0,
            hf_rolloff: [1.0; 2],
            wow: OscillatorCoefficients {
                rate_hz: 0.0,
                phase_increment: 0.0,
                offset: 0.0,
            },
            flutter: OscillatorCoefficients {
                rate_hz: 0.0,
                phase_increment: 0.0,
                offset: 0.0,
            },
        }
    }

    /// Recomputes the head bump and HF rolloff from `params`.
    pub fn update_filters(&mut self, params: &TapeParams, sample_rate: f32) {
        let freq = head_bump_center_hz(params.bump_freq, params.speed);
        let gain_db = head_bump_gain_db(params.head_bump / 100.0, params.formulation);
        let cutoff = hf_cutoff_hz(
            params.speed,
            params.formulation,
            params.warmth / 100.0,
            params.age / 100.0,
        );

        self.head_bump_freq_hz = freq;
        self.head_bump_gain_db = gain_db;
        self.hf_cutoff_hz = cutoff;

        if is_degenerate(sample_rate) {
            self.head_bump = BiquadCoefficients::IDENTITY;
            self.hf_rolloff = [1.0; 2];
        } else {
            self.head_bump = peaking_eq_coefficients(freq, HEAD_BUMP_Q, gain_db, sample_rate);
            let coeff = one_pole_coeff(cutoff, sample_rate);
            self.hf_rolloff = [coeff, coeff];
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            head_bump_hz = freq,
            head_bump_db = gain_db,
            hf_cutoff_hz = cutoff,
            sample_rate,
            "filter coefficients updated"
        );
    }

    /// Draws new wow and flutter generations.
    ///
    /// Draw order: wow rate, wow offset, flutter rate, flutter offset.
    pub fn redraw_oscillators<R: RngCore>(
        &mut self,
        sample_rate: f32,
        noise: &mut NoiseSource<R>,
    ) {
        self.wow = OscillatorCoefficients::draw(&WOW_RATE, sample_rate, noise);
        self.flutter = OscillatorCoefficients::draw(&FLUTTER_RATE, sample_rate, noise);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            wow_hz = self.wow.rate_hz,
            flutter_hz = self.flutter.rate_hz,
            "oscillators redrawn"
        );
    }
}

impl Default for TapeCoefficients {
    fn default() -> Self {
        Self::identity()
    }
}

fn is_degenerate(sample_rate: f32) -> bool {
    !sample_rate.is_finite() || sample_rate <= 0.0
}

/// Phase step per sample; 0 for a degenerate sample rate.
pub fn phase_increment(rate_hz: f32, sample_rate: f32) -> f32 {
    if is_degenerate(sample_rate) {
        0.0
    } else {
        rate_hz / sample_rate
    }
}

/// Head-bump center: base frequency scaled by machine speed.
pub fn head_bump_center_hz(bump_freq: f32, speed: MachineSpeed) -> f32 {
    (bump_freq * speed.head_bump_multiplier()).clamp(HEAD_BUMP_RANGE_HZ.0, HEAD_BUMP_RANGE_HZ.1)
}

/// Head-bump gain for an amount in `[0, 1]`.
pub fn head_bump_gain_db(amount: f32, formulation: TapeFormulation) -> f32 {
    amount * HEAD_BUMP_MAX_DB * formulation.head_bump_gain_factor()
}

/// HF rolloff cutoff for warmth and age in `[0, 1]`.
pub fn hf_cutoff_hz(
    speed: MachineSpeed,
    formulation: TapeFormulation,
    warmth: f32,
    age: f32,
) -> f32 {
    let cutoff = speed.base_cutoff_hz()
        * formulation.cutoff_multiplier()
        * (1.0 - warmth * 0.4)
        * (1.0 - age * 0.3);
    cutoff.clamp(HF_CUTOFF_RANGE_HZ.0, HF_CUTOFF_RANGE_HZ.1)
}

/// Linear hiss level for a percentage; exactly 0 when hiss is off.
pub fn hiss_level(hiss_percent: f32) -> f32 {
    if hiss_percent <= 0.0 {
        return 0.0;
    }
    db_to_linear(map_range(
        hiss_percent,
        0.0,
        100.0,
        HISS_RANGE_DB.0,
        HISS_RANGE_DB.1,
    ))
}

/// Wow delay swing in ms for a percentage.
pub fn wow_depth_ms(wow_percent: f32) -> f32 {
    wow_percent / 100.0 * WOW_MAX_DEPTH_MS
}

/// Flutter delay swing in ms for a percentage.
pub fn flutter_depth_ms(flutter_percent: f32) -> f32 {
    flutter_percent / 100.0 * FLUTTER_MAX_DEPTH_MS
}
