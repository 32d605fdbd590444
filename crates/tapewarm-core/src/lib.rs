//! TapeWarm Core - DSP primitives for tape emulation
//!
//! This crate provides the building blocks the tape machine is assembled from,
//! designed for real-time audio processing with zero allocation in the audio path.
//!
//! # Filters
//!
//! - [`BiquadState`] / [`BiquadCoefficients`] - Direct Form I second-order IIR with RBJ
//!   cookbook coefficients ([`peaking_eq_coefficients`])
//! - [`OnePole`] - One-pole lowpass using the `state += coeff * (input - state)` recurrence
//!
//! # Delay Lines
//!
//! - [`ModulationDelay`] - Multichannel circular buffer with a shared write cursor and
//!   linearly interpolated fractional reads
//!
//! # Parameters
//!
//! - [`AtomicParam`] - Lock-free `f32` cell for control-thread → audio-thread exchange
//! - [`ParamDescriptor`] / [`ParamUnit`] - Range and display metadata
//!
//! # Utilities
//!
//! - Level conversions: [`db_to_linear`], [`linear_to_db`]
//! - Range mapping: [`map_range`]
//! - Saturation curves: [`soft_clip`], [`tape_saturate`], [`hard_clip`], [`hysteresis`]
//! - Coefficients: [`time_constant_coeff`], [`one_pole_coeff`]
//! - Noise: [`NoiseSource`]
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets:
//!
//! ```toml
//! [dependencies]
//! tapewarm-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Finite by construction**: degenerate inputs produce identity coefficients

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod biquad;
pub mod delay;
pub mod math;
pub mod noise;
pub mod one_pole;
pub mod param;

pub use biquad::{BiquadCoefficients, BiquadState, peaking_eq_coefficients};
pub use delay::{DelayTap, MIN_DELAY_LEN, ModulationDelay};
pub use math::{
    MAGNETIC_LIMIT, SILENCE_DB, db_to_linear, flush_denormal, hard_clip, hysteresis, linear_to_db,
    map_range, ms_to_samples, one_pole_coeff, soft_clip, tape_saturate, time_constant_coeff,
    wet_dry_mix,
};
pub use noise::NoiseSource;
pub use one_pole::OnePole;
pub use param::{AtomicParam, ParamDescriptor, ParamUnit};
