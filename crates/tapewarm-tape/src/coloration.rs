//! Head bump and HF rolloff, per channel.
//!
//! Both filters keep their history in [`ChannelColoration`]; the head-bump
//! coefficients are shared and passed in, while each channel's one-pole holds
//! its own coefficient so left and right may differ.

use tapewarm_core::{BiquadCoefficients, BiquadState, OnePole};

/// One channel's coloration filter state.
#[derive(Debug, Clone, Default)]
pub struct ChannelColoration {
    head_bump: BiquadState,
    hf_rolloff: OnePole,
}

impl ChannelColoration {
    /// Zeroed history with a pass-through rolloff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Low-frequency resonance (Direct Form I peaking filter).
    #[inline]
    pub fn head_bump(&mut self, coeffs: &BiquadCoefficients, input: f32) -> f32 {
        self.head_bump.process(coeffs, input)
    }

    /// One-pole lowpass: `s += c * (x - s)`.
    #[inline]
    pub fn hf_rolloff(&mut self, input: f32) -> f32 {
        self.hf_rolloff.process(input)
    }

    /// Installs this channel's rolloff coefficient; history is kept.
    pub fn set_rolloff_coefficient(&mut self, coeff: f32) {
        self.hf_rolloff.set_coefficient(coeff);
    }

    /// This channel's rolloff coefficient.
    pub fn rolloff_coefficient(&self) -> f32 {
        self.hf_rolloff.coefficient()
    }

    /// Clears both histories, keeping the coefficient.
    pub fn reset(&mut self) {
        self.head_bump.clear();
        self.hf_rolloff.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapewarm_core::{one_pole_coeff, peaking_eq_coefficients};

    #[test]
    fn zero_gain_bump_passes_signal() {
        let coeffs = peaking_eq_coefficients(80.0, 1.5, 0.0, 48000.0);
        let mut ch = ChannelColoration::new();
        for i in 0..256 {
            let x = libm::sinf(i as f32 * 0.1) * 0.5;
            let y = ch.head_bump(&coeffs, x);
            assert!((y - x).abs() < 1e-3, "sample {i}: {y} vs {x}");
        }
    }

    #[test]
    fn rolloff_coefficient_survives_reset() {
        let mut ch = ChannelColoration::new();
        let coeff = one_pole_coeff(12_000.0, 48000.0);
        ch.set_rolloff_coefficient(coeff);
        for _ in 0..32 {
            ch.hf_rolloff(1.0);
        }
        ch.reset();
        assert_eq!(ch.rolloff_coefficient(), coeff);
        assert_eq!(ch.hf_rolloff(0.0), 0.0);
    }

    #[test]
    fn channels_keep_separate_history() {
        let coeffs = peaking_eq_coefficients(80.0, 1.5, 6.0, 48000.0);
        let mut left = ChannelColoration::new();
        let mut right = ChannelColoration::new();
        for _ in 0..64 {
            left.head_bump(&coeffs, 1.0);
        }
        // Right never saw input, so its first output is just b0 * x.
        assert_eq!(right.head_bump(&coeffs, 0.5), coeffs.b0 * 0.5);
    }
}
