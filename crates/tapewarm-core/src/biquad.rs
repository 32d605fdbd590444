//! Biquad (bi-quadratic) filter structure.
//!
//! Coefficients and history are kept apart: one [`BiquadCoefficients`] set is
//! derived per parameter change and shared by every channel, while each channel
//! owns its own [`BiquadState`].
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf};

use crate::flush_denormal;

/// Normalized biquad coefficients (`a0` already divided out).
///
/// Implements the Direct Form I difference equation:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficient for x[n]
    pub b0: f32,
    /// Feedforward coefficient for x[n-1]
    pub b1: f32,
    /// Feedforward coefficient for x[n-2]
    pub b2: f32,
    /// Feedback coefficient for y[n-1]
    pub a1: f32,
    /// Feedback coefficient for y[n-2]
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Pass-through coefficients: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Normalize raw cookbook coefficients by `a0`.
    ///
    /// Returns [`Self::IDENTITY`] if `a0` is zero or any result is non-finite.
    pub fn normalized(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        if a0 == 0.0 || !a0.is_finite() {
            return Self::IDENTITY;
        }
        // Divide rather than multiply by 1/a0 so b0 == a0 gives exactly 1.0.
        let coeffs = Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        };
        if coeffs.is_finite() { coeffs } else { Self::IDENTITY }
    }

    /// Whether every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-channel biquad history: two past inputs and two past outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadState {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl BiquadState {
    /// Creates a zeroed history.
    pub const fn new() -> Self {
        Self {
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Processes a single sample and shifts the history.
    #[inline]
    pub fn process(&mut self, coeffs: &BiquadCoefficients, input: f32) -> f32 {
        let output = coeffs.b0 * input + coeffs.b1 * self.x1 + coeffs.b2 * self.x2
            - coeffs.a1 * self.y1
            - coeffs.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = flush_denormal(output);

        output
    }

    /// Clears the history without touching coefficients.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

/// Calculates peaking EQ coefficients using the RBJ cookbook formula.
///
/// A peaking EQ boosts or cuts around a center frequency with a bell shape.
///
/// # Arguments
///
/// * `frequency` - Center frequency in Hz
/// * `q` - Q factor (bandwidth = frequency / Q)
/// * `gain_db` - Gain in decibels (positive = boost, negative = cut)
/// * `sample_rate` - Sample rate in Hz
///
/// Returns [`BiquadCoefficients::IDENTITY`] for a non-positive sample rate, Q or
/// frequency. Frequencies are held below Nyquist (`0.49 * sample_rate`). At 0 dB the
/// result is exactly pass-through (`b0 = 1`, `b1 = a1`, `b2 = a2`).
pub fn peaking_eq_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> BiquadCoefficients {
    if !sample_rate.is_finite() || sample_rate <= 0.0 || q.is_nan() || q <= 0.0 {
        return BiquadCoefficients::IDENTITY;
    }
    if frequency.is_nan() || frequency <= 0.0 {
        return BiquadCoefficients::IDENTITY;
    }
    let frequency = frequency.min(sample_rate * 0.49);

    let a = powf(10.0, gain_db / 40.0); // sqrt(10^(dB/20))
    let omega = 2.0 * PI * frequency / sample_rate;
    let cos_omega = cosf(omega);
    let sin_omega = sinf(omega);
    let alpha = sin_omega / (2.0 * q);

    let b0 = 1.0 + alpha * a;
    let b1 = -2.0 * cos_omega;
    let b2 = 1.0 - alpha * a;
    let a0 = 1.0 + alpha / a;
    let a1 = -2.0 * cos_omega;
    let a2 = 1.0 - alpha / a;

    BiquadCoefficients::normalized(b0, b1, b2, a0, a1, a2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_passthrough() {
        let mut state = BiquadState::new();
        for i in 0..10 {
            let input = i as f32 * 0.1;
            assert_eq!(state.process(&BiquadCoefficients::IDENTITY, input), input);
        }
    }

    #[test]
    fn test_state_clear() {
        let coeffs = peaking_eq_coefficients(100.0, 1.5, 6.0, 48000.0);
        let mut state = BiquadState::new();
        for _ in 0..10 {
            state.process(&coeffs, 1.0);
        }
        state.clear();
        assert_eq!(state, BiquadState::new());
    }

    #[test]
    fn test_peaking_eq_coefficients_finite() {
        for gain in [-12.0, -6.0, 0.0, 6.0, 7.2] {
            let c = peaking_eq_coefficients(80.0, 1.5, gain, 44100.0);
            assert!(c.is_finite(), "gain {gain} produced {c:?}");
        }
    }

    #[test]
    fn test_peaking_eq_zero_gain_is_passthrough() {
        let c = peaking_eq_coefficients(80.0, 1.5, 0.0, 48000.0);
        assert_eq!(c.b0, 1.0);
        assert_eq!(c.b1, c.a1);
        assert_eq!(c.b2, c.a2);

        let mut state = BiquadState::new();
        for i in 0..512 {
            let input = libm::sinf(i as f32 * 0.05) * 0.7;
            let output = state.process(&c, input);
            assert!((output - input).abs() < 1e-3, "sample {i}: {output} vs {input}");
        }
    }

    #[test]
    fn test_peaking_eq_boosts_center() {
        let sr = 48000.0;
        let freq = 100.0;
        let c = peaking_eq_coefficients(freq, 1.5, 6.0, sr);
        let mut state = BiquadState::new();

        let mut peak = 0.0f32;
        for i in 0..(sr as usize) {
            let x = libm::sinf(2.0 * PI * freq * i as f32 / sr);
            let y = state.process(&c, x);
            if i > sr as usize / 2 {
                peak = peak.max(y.abs());
            }
        }
        // +6 dB ≈ 2x at the center frequency
        assert!((peak - 2.0).abs() < 0.05, "center gain {peak}");
    }

    #[test]
    fn test_degenerate_sample_rate_is_identity() {
        assert_eq!(
            peaking_eq_coefficients(80.0, 1.5, 6.0, 0.0),
            BiquadCoefficients::IDENTITY
        );
        assert_eq!(
            peaking_eq_coefficients(80.0, 0.0, 6.0, 48000.0),
            BiquadCoefficients::IDENTITY
        );
        assert_eq!(
            BiquadCoefficients::normalized(1.0, 2.0, 3.0, 0.0, 1.0, 1.0),
            BiquadCoefficients::IDENTITY
        );
    }

    #[test]
    fn test_center_above_nyquist_stays_stable() {
        let coeffs = peaking_eq_coefficients(80.0, 1.5, 7.2, 100.0);
        assert!(coeffs.a2.abs() < 1.0);
        let mut state = BiquadState::new();
        let mut last = 0.0;
        for i in 0..10_000 {
            last = state.process(&coeffs, if i == 0 { 1.0 } else { 0.0 });
            assert!(last.is_finite());
        }
        assert!(last.abs() < 1e-6);
    }
}
