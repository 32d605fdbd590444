//! Tape hiss.

use rand::RngCore;
use tapewarm_core::NoiseSource;

use crate::coefficients::hiss_level;

/// Uniform noise scaled into the hiss floor.
const NOISE_SCALE: f32 = 0.7;
/// Share of the left sample carried into the right.
const STEREO_CORRELATION: f32 = 0.9;

/// Level-scaled hiss with mildly correlated stereo.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HissGenerator {
    level: f32,
}

impl HissGenerator {
    /// Generator at the level for `percent`.
    pub fn new(percent: f32) -> Self {
        Self {
            level: hiss_level(percent),
        }
    }

    /// Sets the level from a percentage; 0 turns hiss off.
    pub fn set_amount(&mut self, percent: f32) {
        self.level = hiss_level(percent);
    }

    /// Linear level.
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Whether any hiss is produced.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.level > 0.0
    }

    /// Left and right hiss for one frame. Consumes two draws.
    #[inline]
    pub fn next_frame<R: RngCore>(&self, noise: &mut NoiseSource<R>) -> [f32; 2] {
        let scale = NOISE_SCALE * self.level;
        let left = noise.next_sample() * scale;
        let fresh = noise.next_sample() * scale;
        [left, STEREO_CORRELATION * left + (1.0 - STEREO_CORRELATION) * fresh]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn off_at_zero() {
        let hiss = HissGenerator::new(0.0);
        assert!(!hiss.is_active());
        let mut noise = NoiseSource::with_seed(1);
        assert_eq!(hiss.next_frame(&mut noise), [0.0, 0.0]);
    }

    #[test]
    fn bounded_by_level() {
        let hiss = HissGenerator::new(100.0);
        let bound = NOISE_SCALE * hiss.level();
        let mut noise = NoiseSource::with_seed(7);
        for _ in 0..10_000 {
            let [l, r] = hiss.next_frame(&mut noise);
            assert!(l.abs() <= bound + 1e-9);
            assert!(r.abs() <= bound + 1e-9);
        }
    }

    #[test]
    fn channels_are_correlated_not_equal() {
        let hiss = HissGenerator::new(100.0);
        let mut noise = NoiseSource::with_seed(3);
        let (mut lr, mut ll, mut rr) = (0.0f64, 0.0f64, 0.0f64);
        let mut identical = 0;
        for _ in 0..20_000 {
            let [l, r] = hiss.next_frame(&mut noise);
            if l == r {
                identical += 1;
            }
            lr += f64::from(l) * f64::from(r);
            ll += f64::from(l) * f64::from(l);
            rr += f64::from(r) * f64::from(r);
        }
        let correlation = lr / (ll * rr).sqrt();
        assert!(correlation > 0.95 && correlation < 0.999, "{correlation}");
        assert!(identical < 10);
    }

    #[test]
    fn same_seed_same_hiss() {
        let hiss = HissGenerator::new(40.0);
        let mut a = NoiseSource::with_seed(99);
        let mut b = NoiseSource::with_seed(99);
        for _ in 0..64 {
            assert_eq!(hiss.next_frame(&mut a), hiss.next_frame(&mut b));
        }
    }
}
