//! One-pole lowpass filter for HF rolloff.
//!
//! A single-pole IIR lowpass with the recurrence:
//!
//! ```text
//! y[n] = y[n-1] + coeff * (x[n] - y[n-1])
//! ```
//!
//! where `coeff = ω / (1 + ω)` and `ω = 2π * freq / sample_rate`
//! (see [`one_pole_coeff`]).
//!
//! 6 dB/octave rolloff, zero latency, one multiply per sample. `coeff = 1`
//! passes the input straight through.
//!
//! # Usage
//!
//! ```rust
//! use tapewarm_core::OnePole;
//!
//! let mut lp = OnePole::new(48000.0, 4000.0);
//! let filtered = lp.process(1.0);
//! assert!(filtered < 1.0); // attenuated on the first sample
//! ```

use crate::{flush_denormal, one_pole_coeff};

/// One-pole (6 dB/oct) lowpass filter.
///
/// # Invariants
///
/// - `coeff` is always in (0, 1] for stable operation
/// - `state` is flushed to zero when below 1e-20 (denormal protection)
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
}

impl OnePole {
    /// Create a new one-pole lowpass filter from a cutoff frequency.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            state: 0.0,
            coeff: one_pole_coeff(freq_hz, sample_rate),
        }
    }

    /// A filter that passes its input unchanged until a coefficient is set.
    pub const fn passthrough() -> Self {
        Self {
            state: 0.0,
            coeff: 1.0,
        }
    }

    /// Set the cutoff frequency.
    pub fn set_cutoff(&mut self, freq_hz: f32, sample_rate: f32) {
        self.coeff = one_pole_coeff(freq_hz, sample_rate);
    }

    /// Set a precomputed coefficient, clamped to (0, 1].
    ///
    /// Non-finite values fall back to pass-through.
    pub fn set_coefficient(&mut self, coeff: f32) {
        self.coeff = if coeff.is_finite() {
            coeff.clamp(f32::EPSILON, 1.0)
        } else {
            1.0
        };
    }

    /// Current coefficient.
    pub fn coefficient(&self) -> f32 {
        self.coeff
    }

    /// Process one sample through the lowpass filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(self.state + self.coeff * (input - self.state));
        self.state
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

impl Default for OnePole {
    fn default() -> Self {
        Self::passthrough()
    }
}
