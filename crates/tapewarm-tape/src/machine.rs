//! The assembled tape machine.
//!
//! [`TapeMachine`] owns every piece of state the chain needs and runs the
//! stages in a fixed order for each channel of each frame:
//!
//! ```text
//! dry ─► × input ─► saturation ─► head bump ─► HF rolloff
//!     ─► wow/flutter ─► + hiss ─► × output ─► mix(dry, wet) ─► out
//! ```
//!
//! Saturation, head bump, wow/flutter and hiss are skipped while their amount
//! is zero; the HF rolloff always runs. Only the first two channels of a
//! block are touched.
//!
//! ## Parameters
//!
//! | Parameter | Range | Default | Recomputes |
//! |-----------|-------|---------|------------|
//! | Input drive | -12–12 dB | 0 | |
//! | Saturation | 0–100% | 50 | |
//! | Warmth | 0–100% | 50 | filters |
//! | Head bump | 0–100% | 50 | filters |
//! | Bump frequency | 40–150 Hz | 80 | filters |
//! | Wow / flutter | 0–100% | 0 | |
//! | Hiss | 0–100% | 0 | |
//! | Output | -12–12 dB | 0 | |
//! | Mix | 0–100% | 100 | |
//! | Age | 0–100% | 0 | filters and oscillators |
//! | Bias | 0–100% | 50 | |
//! | Speed | 7.5 / 15 / 30 ips | 15 | filters |
//! | Formulation | ferric / chrome / modern | ferric | filters |
//!
//! # Example
//!
//! ```rust
//! use tapewarm_tape::TapeMachine;
//!
//! let mut machine = TapeMachine::with_seed(48000.0, 7);
//! machine.set_wow(20.0);
//!
//! let mut left = vec![0.25_f32; 512];
//! let mut right = vec![0.25_f32; 512];
//! machine.process(&mut [&mut left[..], &mut right[..]]);
//! assert!(machine.output_level() > 0.0);
//! ```

use alloc::sync::Arc;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use tapewarm_core::{NoiseSource, db_to_linear, wet_dry_mix};

use crate::coefficients::TapeCoefficients;
use crate::coloration::ChannelColoration;
use crate::hiss::HissGenerator;
use crate::meter::{LevelMeter, block_peak};
use crate::params::{MachineSpeed, ParamId, SharedTapeParams, TapeFormulation, TapeParams};
use crate::saturation::SaturationStage;
use crate::wow_flutter::WowFlutter;

/// Channels processed per block.
pub const MAX_CHANNELS: usize = 2;
/// Block size assumed until [`TapeMachine::prepare`] says otherwise.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Recursive state owned by one channel.
#[derive(Debug, Clone, Default)]
pub struct ChannelState {
    /// Head-bump and rolloff filter history.
    pub coloration: ChannelColoration,
    /// Magnetisation memory of the saturation stage.
    pub hysteresis: f32,
}

impl ChannelState {
    /// Zeroes the history; the rolloff coefficient is kept.
    pub fn reset(&mut self) {
        self.coloration.reset();
        self.hysteresis = 0.0;
    }
}

/// Stereo tape emulation with a caller-chosen jitter generator.
#[derive(Debug)]
pub struct TapeMachine<R: RngCore = SmallRng> {
    sample_rate: f32,
    block_size: usize,
    params: TapeParams,
    coeffs: TapeCoefficients,
    input_gain: f32,
    output_gain: f32,
    mix: f32,
    saturation: SaturationStage,
    wow_flutter: WowFlutter,
    hiss: HissGenerator,
    channels: [ChannelState; MAX_CHANNELS],
    noise: NoiseSource<R>,
    meter: Arc<LevelMeter>,
}

impl<R: RngCore> TapeMachine<R> {
    /// Machine with default controls, prepared for `sample_rate`.
    ///
    /// Every random draw (oscillator rates, drift, hiss) comes from `rng`.
    pub fn new(sample_rate: f32, rng: R) -> Self {
        let params = TapeParams::default();
        let mut machine = Self {
            sample_rate,
            block_size: DEFAULT_BLOCK_SIZE,
            params,
            coeffs: TapeCoefficients::identity(),
            input_gain: 1.0,
            output_gain: 1.0,
            mix: 1.0,
            saturation: SaturationStage::new(params.saturation, params.bias, params.formulation),
            wow_flutter: WowFlutter::new(MAX_CHANNELS, sample_rate),
            hiss: HissGenerator::default(),
            channels: Default::default(),
            noise: NoiseSource::new(rng),
            meter: Arc::new(LevelMeter::new()),
        };
        machine.apply_scalars();
        machine.prepare(sample_rate, DEFAULT_BLOCK_SIZE);
        machine
    }

    /// Builder form of [`set_params`](Self::set_params).
    #[must_use]
    pub fn with_params(mut self, params: &TapeParams) -> Self {
        self.set_params(params);
        self
    }

    /// Reallocates the delay buffers, recomputes every coefficient, draws new
    /// oscillator rates and clears all state.
    pub fn prepare(&mut self, sample_rate: f32, block_size: usize) {
        self.sample_rate = sample_rate;
        self.block_size = block_size;
        self.wow_flutter.prepare(MAX_CHANNELS, sample_rate);
        self.recompute_filters();
        self.redraw_oscillators();
        self.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            block_size,
            delay_len = self.wow_flutter.delay().len(),
            "tape machine prepared"
        );
    }

    /// Zeroes filter, hysteresis, oscillator-phase and delay state.
    ///
    /// Coefficients, oscillator rates and controls are untouched.
    pub fn reset(&mut self) {
        for channel in &mut self.channels {
            channel.reset();
        }
        self.wow_flutter.reset();
        self.meter.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!("tape machine reset");
    }

    /// Processes a block in place.
    ///
    /// Channels past the second are left untouched, as are samples past the
    /// end of the shortest processed channel.
    pub fn process(&mut self, channels: &mut [&mut [f32]]) {
        let active = channels.len().min(MAX_CHANNELS);
        let channels = &mut channels[..active];
        let frames = channels.iter().map(|ch| ch.len()).min().unwrap_or(0);
        if frames == 0 {
            return;
        }

        let input_peak = block_peak(channels, frames);

        let saturate = self.saturation.is_active();
        let bump = self.params.head_bump > 0.0;
        let hiss = self.hiss.is_active();

        for i in 0..frames {
            self.wow_flutter.begin_frame(&mut self.noise);
            let noise = if hiss {
                self.hiss.next_frame(&mut self.noise)
            } else {
                [0.0; MAX_CHANNELS]
            };

            for (ch, buffer) in channels.iter_mut().enumerate() {
                let state = &mut self.channels[ch];
                let dry = buffer[i];

                let mut s = dry * self.input_gain;
                if saturate {
                    s = self.saturation.process(s, &mut state.hysteresis);
                }
                if bump {
                    s = state.coloration.head_bump(&self.coeffs.head_bump, s);
                }
                s = state.coloration.hf_rolloff(s);
                s = self.wow_flutter.process(ch, s);
                if hiss {
                    s += noise[ch];
                }
                s *= self.output_gain;

                buffer[i] = wet_dry_mix(dry, s, self.mix);
            }

            self.wow_flutter.end_frame();
        }

        self.meter.publish(input_peak, block_peak(channels, frames));
    }

    /// Sets any control by id, clamping to its range.
    ///
    /// Controls that feed the coefficients only trigger a recomputation when
    /// the clamped value actually changes.
    pub fn set_param(&mut self, id: ParamId, value: f32) {
        let before = self.params.get(id);
        self.params.set(id, value);
        if self.params.get(id) == before {
            return;
        }

        match id {
            ParamId::InputDrive => self.input_gain = db_to_linear(self.params.input_drive),
            ParamId::Output => self.output_gain = db_to_linear(self.params.output),
            ParamId::Mix => self.mix = self.params.mix / 100.0,
            ParamId::Saturation => self.saturation.set_saturation(self.params.saturation),
            ParamId::Bias => self.saturation.set_bias(self.params.bias),
            ParamId::Wow => self.wow_flutter.set_wow(self.params.wow),
            ParamId::Flutter => self.wow_flutter.set_flutter(self.params.flutter),
            ParamId::Hiss => self.hiss.set_amount(self.params.hiss),
            ParamId::Warmth | ParamId::HeadBump | ParamId::BumpFreq | ParamId::Speed => {
                self.recompute_filters();
            }
            ParamId::Formulation => {
                self.saturation.set_formulation(self.params.formulation);
                self.recompute_filters();
            }
            ParamId::Age => {
                self.wow_flutter.set_age(self.params.age);
                self.recompute_filters();
                self.redraw_oscillators();
            }
        }
    }

    /// Input drive in dB.
    pub fn set_input_drive(&mut self, db: f32) {
        self.set_param(ParamId::InputDrive, db);
    }

    /// Saturation amount in percent.
    pub fn set_saturation(&mut self, percent: f32) {
        self.set_param(ParamId::Saturation, percent);
    }

    /// Warmth in percent; darkens the HF rolloff.
    pub fn set_warmth(&mut self, percent: f32) {
        self.set_param(ParamId::Warmth, percent);
    }

    /// Head-bump amount in percent.
    pub fn set_head_bump(&mut self, percent: f32) {
        self.set_param(ParamId::HeadBump, percent);
    }

    /// Head-bump base frequency in Hz, before speed scaling.
    pub fn set_bump_freq(&mut self, hz: f32) {
        self.set_param(ParamId::BumpFreq, hz);
    }

    /// Wow depth in percent.
    pub fn set_wow(&mut self, percent: f32) {
        self.set_param(ParamId::Wow, percent);
    }

    /// Flutter depth in percent.
    pub fn set_flutter(&mut self, percent: f32) {
        self.set_param(ParamId::Flutter, percent);
    }

    /// Hiss level in percent.
    pub fn set_hiss(&mut self, percent: f32) {
        self.set_param(ParamId::Hiss, percent);
    }

    /// Output gain in dB.
    pub fn set_output(&mut self, db: f32) {
        self.set_param(ParamId::Output, db);
    }

    /// Dry/wet mix in percent.
    pub fn set_mix(&mut self, percent: f32) {
        self.set_param(ParamId::Mix, percent);
    }

    /// Age in percent; darkens the rolloff, widens modulation and redraws
    /// the oscillator rates.
    pub fn set_age(&mut self, percent: f32) {
        self.set_param(ParamId::Age, percent);
    }

    /// Bias in percent; 50 is neutral.
    pub fn set_bias(&mut self, percent: f32) {
        self.set_param(ParamId::Bias, percent);
    }

    /// Machine speed.
    pub fn set_speed(&mut self, speed: MachineSpeed) {
        self.set_param(ParamId::Speed, speed.index() as f32);
    }

    /// Tape formulation.
    pub fn set_formulation(&mut self, formulation: TapeFormulation) {
        self.set_param(ParamId::Formulation, formulation.index() as f32);
    }

    /// Applies every control in `params`.
    pub fn set_params(&mut self, params: &TapeParams) {
        for id in ParamId::ALL {
            self.set_param(id, params.get(id));
        }
    }

    /// Picks up the control thread's values. Call once per block, before
    /// [`process`](Self::process).
    pub fn sync_params(&mut self, shared: &SharedTapeParams) {
        for id in ParamId::ALL {
            self.set_param(id, shared.get(id));
        }
    }

    /// Current controls.
    pub fn params(&self) -> &TapeParams {
        &self.params
    }

    /// Derived coefficients.
    pub fn coefficients(&self) -> &TapeCoefficients {
        &self.coeffs
    }

    /// Pitch-modulation engine, for inspecting the read position.
    pub fn wow_flutter(&self) -> &WowFlutter {
        &self.wow_flutter
    }

    /// Recursive state of channel `index`, if it exists.
    pub fn channel_state(&self, index: usize) -> Option<&ChannelState> {
        self.channels.get(index)
    }

    /// Sample rate from the last [`prepare`](Self::prepare).
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Block size from the last [`prepare`](Self::prepare).
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Always 0: the modulation delay is part of the sound, not latency.
    pub fn latency_samples(&self) -> usize {
        0
    }

    /// Input peak of the last block.
    pub fn input_level(&self) -> f32 {
        self.meter.input_level()
    }

    /// Output peak of the last block.
    pub fn output_level(&self) -> f32 {
        self.meter.output_level()
    }

    /// Shared handle for observers on other threads.
    pub fn meter(&self) -> Arc<LevelMeter> {
        Arc::clone(&self.meter)
    }

    fn apply_scalars(&mut self) {
        let p = self.params;
        self.input_gain = db_to_linear(p.input_drive);
        self.output_gain = db_to_linear(p.output);
        self.mix = p.mix / 100.0;
        self.saturation = SaturationStage::new(p.saturation, p.bias, p.formulation);
        self.wow_flutter.set_wow(p.wow);
        self.wow_flutter.set_flutter(p.flutter);
        self.wow_flutter.set_age(p.age);
        self.hiss.set_amount(p.hiss);
    }

    fn recompute_filters(&mut self) {
        self.coeffs.update_filters(&self.params, self.sample_rate);
        for (channel, coeff) in self.channels.iter_mut().zip(self.coeffs.hf_rolloff) {
            channel.coloration.set_rolloff_coefficient(coeff);
        }
    }

    fn redraw_oscillators(&mut self) {
        self.coeffs
            .redraw_oscillators(self.sample_rate, &mut self.noise);
        self.wow_flutter.retune(&self.coeffs);
    }
}

impl TapeMachine<SmallRng> {
    /// Deterministic machine: the same seed gives the same output.
    pub fn with_seed(sample_rate: f32, seed: u64) -> Self {
        Self::new(sample_rate, SmallRng::seed_from_u64(seed))
    }

    /// Machine seeded from operating-system entropy.
    #[cfg(feature = "std")]
    pub fn from_entropy(sample_rate: f32) -> Self {
        Self::new(sample_rate, SmallRng::from_entropy())
    }
}
