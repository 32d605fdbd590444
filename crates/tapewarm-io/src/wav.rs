//! WAV file reading and writing.
//!
//! Audio is exchanged as one `Vec<f32>` per channel, the layout
//! [`TapeMachine::process`](tapewarm_tape::TapeMachine::process) works on.
//! Only mono and stereo files are accepted.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavWriter};

use crate::{Error, Result};

/// Largest channel count the tape machine processes.
pub const MAX_CHANNELS: u16 = 2;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let num_frames = u64::from(reader.duration());
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// Output file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth: 16 or 24 (integer) or 32 (float).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 24,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

fn check_channels(channels: usize) -> Result<()> {
    if channels == 0 || channels > usize::from(MAX_CHANNELS) {
        return Err(Error::UnsupportedChannels(channels));
    }
    Ok(())
}

/// Read a mono or stereo WAV file as one `Vec<f32>` per channel.
///
/// Integer samples are scaled to `[-1, 1)`; float samples are passed through.
///
/// # Example
/// ```ignore
/// let (channels, spec) = read_wav_channels("input.wav")?;
/// println!("{} channels at {} Hz", channels.len(), spec.sample_rate);
/// ```
pub fn read_wav_channels<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);
    let channels = usize::from(spec.channels);
    check_channels(channels)?;

    tracing::info!(
        path = %path.display(),
        channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        "reading WAV"
    );

    let interleaved: Vec<f32> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample)?;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    if interleaved.is_empty() {
        return Err(Error::Empty(path.to_path_buf()));
    }

    let frames = interleaved.len() / channels;
    let mut out = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (channel, &sample) in out.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    tracing::debug!(frames, "WAV decoded");
    Ok((out, spec))
}

/// Write one slice per channel to a WAV file.
///
/// `spec.channels` is taken from `channels.len()`. Channels of different
/// length are truncated to the shortest. Integer output is clamped to full
/// scale.
///
/// # Example
/// ```ignore
/// let left = vec![0.0f32; 48000];
/// let right = vec![0.0f32; 48000];
/// write_wav_channels("output.wav", &[left, right], WavSpec::default())?;
/// ```
pub fn write_wav_channels<P, C>(path: P, channels: &[C], spec: WavSpec) -> Result<()>
where
    P: AsRef<Path>,
    C: AsRef<[f32]>,
{
    let path = path.as_ref();
    check_channels(channels.len())?;
    if !matches!(spec.bits_per_sample, 16 | 24 | 32) {
        return Err(Error::UnsupportedBitDepth(spec.bits_per_sample));
    }

    let spec = WavSpec {
        channels: channels.len() as u16,
        ..spec
    };
    let frames = channels
        .iter()
        .map(|c| c.as_ref().len())
        .min()
        .unwrap_or(0);

    tracing::info!(
        path = %path.display(),
        channels = spec.channels,
        frames,
        bits = spec.bits_per_sample,
        "writing WAV"
    );

    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    if spec.bits_per_sample == 32 {
        for i in 0..frames {
            for channel in channels {
                writer.write_sample(channel.as_ref()[i])?;
            }
        }
    } else {
        let max_val = int_scale(spec.bits_per_sample)?;
        for i in 0..frames {
            for channel in channels {
                let sample = channel.as_ref()[i];
                let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

fn int_scale(bits: u16) -> Result<f32> {
    if bits == 0 || bits > 32 {
        return Err(Error::UnsupportedBitDepth(bits));
    }
    Ok((1i64 << (bits - 1)) as f32)
}
