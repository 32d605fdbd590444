//! File I/O for the TapeWarm tape machine.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav_channels`] and [`write_wav_channels`] for
//!   loading/saving mono or stereo audio as one buffer per channel
//! - **Offline rendering**: [`RenderEngine`] for running whole files through a
//!   [`TapeMachine`](tapewarm_tape::TapeMachine) block by block
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tapewarm_io::{RenderEngine, read_wav_channels, write_wav_channels};
//! use tapewarm_tape::TapeMachine;
//!
//! let (mut channels, spec) = read_wav_channels("input.wav")?;
//!
//! let machine = TapeMachine::with_seed(spec.sample_rate as f32, 1);
//! let mut engine = RenderEngine::new(machine, 512);
//! let stats = engine.render(&mut channels);
//! println!("output peak {:.3}", stats.output_peak);
//!
//! write_wav_channels("output.wav", &channels, spec)?;
//! ```

use std::path::PathBuf;

mod render;
mod wav;

pub use render::{RenderEngine, RenderStats};
pub use wav::{
    MAX_CHANNELS, WavFormat, WavInfo, WavSpec, read_wav_channels, read_wav_info,
    write_wav_channels,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Channel count other than mono or stereo.
    #[error("Unsupported channel count: {0} (mono or stereo only)")]
    UnsupportedChannels(usize),

    /// Bit depth that can't be written (or read).
    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    /// The file holds no samples.
    #[error("No audio in {}", .0.display())]
    Empty(PathBuf),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
