//! Property-based tests for tapewarm-core DSP primitives.
//!
//! Tests filter stability, saturation bounds and delay index safety using
//! proptest for randomized input generation.

use proptest::prelude::*;
use tapewarm_core::{
    AtomicParam, BiquadState, MAGNETIC_LIMIT, ModulationDelay, OnePole, hysteresis,
    one_pole_coeff, peaking_eq_coefficients,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Peaking filters across the head-bump range stay finite on random input.
    #[test]
    fn peaking_stability(
        freq in 30.0f32..200.0f32,
        gain_db in -8.0f32..8.0f32,
        sample_rate in prop::sample::select(vec![44100.0f32, 48000.0, 96000.0, 192000.0]),
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let coeffs = peaking_eq_coefficients(freq, 1.5, gain_db, sample_rate);
        prop_assert!(coeffs.is_finite());

        let mut state = BiquadState::new();
        for _ in 0..32 {
            for &sample in &input {
                let out = state.process(&coeffs, sample);
                prop_assert!(out.is_finite() && out.abs() < 10.0, "out = {}", out);
            }
        }
    }

    /// One-pole output never exceeds the peak input magnitude.
    #[test]
    fn one_pole_bounded_by_input(
        cutoff in 2000.0f32..20000.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut lp = OnePole::passthrough();
        lp.set_coefficient(one_pole_coeff(cutoff, 48000.0));
        let coeff = lp.coefficient();
        prop_assert!(coeff > 0.0 && coeff < 1.0);

        for &sample in &input {
            let out = lp.process(sample);
            prop_assert!(out.abs() <= 1.0 + 1e-6, "out = {}", out);
        }
    }

    /// Hysteresis memory stays inside the magnetic limit for any drive.
    #[test]
    fn hysteresis_memory_bounded(
        saturation in 0.0f32..=1.0f32,
        gain in 0.0f32..20.0f32,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut memory = 0.0;
        for &sample in input.iter().cycle().take(1024) {
            let out = hysteresis(sample * gain, &mut memory, saturation);
            prop_assert!(out.abs() <= MAGNETIC_LIMIT);
            prop_assert_eq!(out, memory);
        }
    }

    /// Any requested delay, finite or not, resolves to in-bounds indices that
    /// never touch the slot after the cursor.
    #[test]
    fn delay_taps_in_bounds(
        len in 4usize..4096,
        steps in 0usize..5000,
        requested in prop::num::f32::ANY,
    ) {
        let mut delay = ModulationDelay::new(2, len);
        for _ in 0..steps {
            delay.advance();
        }
        let tap = delay.tap(requested);
        let ahead = (delay.write_position() + 1) % delay.len();
        prop_assert!(tap.index0 < delay.len());
        prop_assert!(tap.index1 < delay.len());
        prop_assert_ne!(tap.index0, ahead);
        prop_assert_ne!(tap.index1, ahead);
        prop_assert!(delay.read(0, requested).is_finite());
    }

    /// Atomic parameters always hold an in-range value.
    #[test]
    fn atomic_param_in_range(value in prop::num::f32::ANY) {
        let param = AtomicParam::new(80.0, 40.0, 150.0);
        param.set(value);
        let stored = param.get();
        prop_assert!((40.0..=150.0).contains(&stored), "stored {}", stored);
    }
}
