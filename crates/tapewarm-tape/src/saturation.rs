//! Formulation-dependent tape saturation.
//!
//! Bias shifts the operating point by up to ±0.05 before the drive, then each
//! formulation shapes the signal its own way:
//!
//! | Formulation | Drive | Curve | Memory |
//! |-------------|-------|-------|--------|
//! | Ferric | ×1.3 | [`hysteresis`] × 0.8 | drives the output |
//! | Chrome | ×0.9 | `tanh` | 90/10 tracking of the output |
//! | Modern | ×0.7 | linear, soft knee above 0.7 | 95/5 tracking |
//!
//! Base drive is `1 + 4 * saturation`, so 50% saturation is 3× before the
//! formulation factor. The memory value is owned by the caller (one per
//! channel) and never shared.

use libm::{copysignf, tanhf};
use tapewarm_core::{flush_denormal, hysteresis};

use crate::params::TapeFormulation;

/// Output scale of the ferric hysteresis path.
pub const FERRIC_MAKEUP: f32 = 0.8;
/// Level where the modern curve leaves the linear region.
pub const MODERN_KNEE: f32 = 0.7;

/// Saturation settings shared by all channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationStage {
    amount: f32,
    drive: f32,
    bias_offset: f32,
    formulation: TapeFormulation,
}

impl SaturationStage {
    /// Stage configured from saturation and bias percentages.
    pub fn new(saturation: f32, bias: f32, formulation: TapeFormulation) -> Self {
        let mut stage = Self {
            amount: 0.0,
            drive: 1.0,
            bias_offset: 0.0,
            formulation,
        };
        stage.set_saturation(saturation);
        stage.set_bias(bias);
        stage
    }

    /// Sets the saturation amount from a percentage.
    pub fn set_saturation(&mut self, percent: f32) {
        self.amount = percent.clamp(0.0, 100.0) / 100.0;
        self.update_drive();
    }

    /// Sets the bias from a percentage; 50% is neutral.
    pub fn set_bias(&mut self, percent: f32) {
        self.bias_offset = (percent.clamp(0.0, 100.0) / 100.0 - 0.5) * 0.1;
    }

    /// Switches formulation.
    pub fn set_formulation(&mut self, formulation: TapeFormulation) {
        self.formulation = formulation;
        self.update_drive();
    }

    fn update_drive(&mut self) {
        self.drive = (1.0 + self.amount * 4.0) * self.formulation.drive_factor();
    }

    /// Saturation amount in `[0, 1]`.
    pub fn amount(&self) -> f32 {
        self.amount
    }

    /// Total drive including the formulation factor.
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Bias offset added before the drive.
    pub fn bias_offset(&self) -> f32 {
        self.bias_offset
    }

    /// Whether the stage runs at all.
    pub fn is_active(&self) -> bool {
        self.amount > 0.0
    }

    /// Shapes one sample, updating this channel's memory.
    #[inline]
    pub fn process(&self, input: f32, memory: &mut f32) -> f32 {
        let driven = (input + self.bias_offset) * self.drive;
        match self.formulation {
            TapeFormulation::Ferric => hysteresis(driven, memory, self.amount) * FERRIC_MAKEUP,
            TapeFormulation::Chrome => {
                let out = tanhf(driven);
                *memory = flush_denormal(*memory * 0.9 + out * 0.1);
                out
            }
            TapeFormulation::Modern => {
                let out = modern_knee(driven);
                *memory = flush_denormal(*memory * 0.95 + out * 0.05);
                out
            }
        }
    }
}

impl Default for SaturationStage {
    fn default() -> Self {
        Self::new(50.0, 50.0, TapeFormulation::default())
    }
}

/// Linear below [`MODERN_KNEE`], then a tanh shoulder that never exceeds 1.
#[inline]
pub fn modern_knee(x: f32) -> f32 {
    let magnitude = x.abs();
    if magnitude <= MODERN_KNEE {
        x
    } else {
        let shaped = MODERN_KNEE + tanhf((magnitude - MODERN_KNEE) * 2.0) * (1.0 - MODERN_KNEE);
        copysignf(shaped, x)
    }
}
