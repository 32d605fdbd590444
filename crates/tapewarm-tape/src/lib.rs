//! TapeWarm Tape - Analog tape machine emulation
//!
//! This crate assembles the `tapewarm-core` primitives into a complete tape
//! chain:
//!
//! - [`TapeMachine`] - The full machine: gain staging, stages in fixed order,
//!   dry/wet mix and peak telemetry
//! - [`SaturationStage`] - Ferric hysteresis, chrome `tanh`, modern soft knee
//! - [`ChannelColoration`] - Head-bump resonance and HF rolloff
//! - [`WowFlutter`] - Two irregular oscillators sweeping a fractional delay
//! - [`HissGenerator`] - Level-scaled, mildly correlated stereo hiss
//! - [`TapeCoefficients`] - Control → coefficient mapping
//! - [`LevelMeter`] / [`PeakFollower`] - Lock-free block peaks and meter ballistics
//!
//! Controls are described by [`TapeParams`] (plain values), [`ParamId`] and
//! [`PARAM_DESCRIPTORS`] (metadata), and [`SharedTapeParams`] (atomic cells a
//! control thread can write while the audio thread runs).
//!
//! ## Example
//!
//! ```rust
//! use tapewarm_tape::{MachineSpeed, TapeFormulation, TapeMachine};
//!
//! let mut machine = TapeMachine::with_seed(44100.0, 42);
//! machine.set_speed(MachineSpeed::Ips7_5);
//! machine.set_formulation(TapeFormulation::Chrome);
//! machine.set_flutter(35.0);
//!
//! let mut mono = vec![0.1_f32; 256];
//! machine.process(&mut [&mut mono[..]]);
//! assert!(mono.iter().all(|s| s.is_finite()));
//! ```
//!
//! ## Features
//!
//! - `std` (default) - OS-entropy seeding via [`TapeMachine::from_entropy`]
//! - `serde` - `Serialize`/`Deserialize` for [`TapeParams`] and its enums
//! - `tracing` - `debug` events from `prepare`, `reset` and coefficient updates

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod coefficients;
pub mod coloration;
pub mod hiss;
pub mod machine;
pub mod meter;
pub mod params;
pub mod saturation;
pub mod wow_flutter;

pub use coefficients::{OscillatorCoefficients, OscillatorRange, TapeCoefficients};
pub use coloration::ChannelColoration;
pub use hiss::HissGenerator;
pub use machine::{ChannelState, DEFAULT_BLOCK_SIZE, MAX_CHANNELS, TapeMachine};
pub use meter::{LevelMeter, PeakFollower, block_peak};
pub use params::{
    MachineSpeed, PARAM_COUNT, PARAM_DESCRIPTORS, ParamId, ParseChoiceError, SharedTapeParams,
    TapeFormulation, TapeParams, unit_label,
};
pub use saturation::SaturationStage;
pub use wow_flutter::{Oscillator, ReadProbe, WowFlutter};

pub use tapewarm_core::{ParamDescriptor, ParamUnit};
