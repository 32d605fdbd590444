//! Mathematical utility functions for DSP.
//!
//! Provides the numeric building blocks of the tape chain. All functions are
//! allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`map_range`] - Linear range remapping (e.g. percent → dB floor)
//!
//! # Saturation Curves
//!
//! | Function | Character | Memory |
//! |----------|-----------|--------|
//! | [`soft_clip`] | Smooth, symmetric | No |
//! | [`tape_saturate`] | Smooth, asymmetric (even harmonics) | No |
//! | [`hard_clip`] | Brick-wall | No |
//! | [`hysteresis`] | Lagging, slew-limited | Yes (caller-owned state) |
//!
//! # Coefficients
//!
//! - [`time_constant_coeff`] - One-pole smoothing coefficient from a time constant
//! - [`one_pole_coeff`] - One-pole lowpass coefficient from a cutoff frequency
//!
//! Both return `1.0` (an identity smoother: output follows input immediately) for
//! degenerate configuration instead of dividing by zero.

use core::f32::consts::TAU;
use libm::{expf, log10f, powf, tanhf};

/// Level reported by [`linear_to_db`] for silence or negative input.
pub const SILENCE_DB: f32 = -100.0;

/// Magnetic saturation limit of the [`hysteresis`] memory.
pub const MAGNETIC_LIMIT: f32 = 1.0;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use tapewarm_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    powf(10.0, db / 20.0)
}

/// Convert linear gain to decibels.
///
/// Returns [`SILENCE_DB`] for zero or negative input.
///
/// # Example
/// ```rust
/// use tapewarm_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert_eq!(linear_to_db(0.0), -100.0);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    if linear > 0.0 {
        20.0 * log10f(linear)
    } else {
        SILENCE_DB
    }
}

/// Map `value` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// No clamping is applied. An empty input range maps everything to `out_min`.
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    out_min + (out_max - out_min) * (value - in_min) / span
}

/// Soft clip using hyperbolic tangent. Output in (-1, 1).
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    tanhf(x)
}

/// Asymmetric tanh saturation.
///
/// The positive half is lifted by `0.05 * drive` and the negative half lowered
/// by `0.03 * drive`, adding even harmonics on top of the odd ones from tanh.
#[inline]
pub fn tape_saturate(x: f32, drive: f32) -> f32 {
    let driven = x * drive;
    let y = tanhf(driven);
    let asymmetry = 0.1 * drive;
    if driven > 0.0 {
        y * (1.0 + asymmetry * 0.5)
    } else {
        y * (1.0 - asymmetry * 0.3)
    }
}

/// Clamp to `[-threshold, threshold]`.
#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    let t = threshold.abs();
    x.clamp(-t, t)
}

/// One step of the damped-difference hysteresis model.
///
/// The memory chases the input through a saturating difference term:
///
/// ```text
/// diff  = input - state
/// d     = 1 + 3 * saturation
/// state += tanh(diff * d) / d * (0.3 + 0.4 * saturation)
/// ```
///
/// Large jumps are slew-limited and small ones pass almost linearly, so the
/// output lags and smooths rapid changes the way magnetised media does. The
/// memory never leaves `[-MAGNETIC_LIMIT, MAGNETIC_LIMIT]`.
///
/// Returns the updated state.
#[inline]
pub fn hysteresis(input: f32, state: &mut f32, saturation: f32) -> f32 {
    let diff = input - *state;
    let drive = 1.0 + saturation * 3.0;
    let saturated_diff = tanhf(diff * drive) / drive;
    let lag = 0.3 + saturation * 0.4;

    let next = (*state + saturated_diff * lag).clamp(-MAGNETIC_LIMIT, MAGNETIC_LIMIT);
    *state = flush_denormal(next);
    *state
}

/// One-pole smoothing coefficient for a time constant.
///
/// `coeff = 1 - exp(-1 / (sample_rate * time_ms / 1000))`, to be used as
/// `state += coeff * (target - state)`.
///
/// Non-positive time constants or sample rates return `1.0`.
#[inline]
pub fn time_constant_coeff(sample_rate: f32, time_ms: f32) -> f32 {
    let samples = sample_rate * time_ms * 0.001;
    if !samples.is_finite() || samples <= 0.0 {
        return 1.0;
    }
    1.0 - expf(-1.0 / samples)
}

/// One-pole lowpass coefficient for a cutoff frequency.
///
/// Uses the bilinear-free approximation `ω / (1 + ω)` with
/// `ω = 2π * cutoff / sample_rate`, always in `(0, 1)` for positive input.
///
/// A non-positive or non-finite sample rate returns `1.0` (pass-through).
#[inline]
pub fn one_pole_coeff(cutoff_hz: f32, sample_rate: f32) -> f32 {
    if !sample_rate.is_finite() || sample_rate <= 0.0 || cutoff_hz.is_nan() || cutoff_hz <= 0.0 {
        return 1.0;
    }
    let omega = TAU * cutoff_hz / sample_rate;
    omega / (1.0 + omega)
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Values below 1e-20 are replaced with zero, leaving margin before the
/// IEEE 754 subnormal range. Use in recursive state that can decay forever.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Crossfade between dry and wet signals: `dry * (1 - mix) + wet * mix`.
///
/// Written in the two-product form so `mix = 0` returns `dry` bit-exactly.
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}
