//! File-based tape processing command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tapewarm_io::{RenderEngine, WavSpec, read_wav_channels, write_wav_channels};
use tapewarm_tape::{DEFAULT_BLOCK_SIZE, MachineSpeed, TapeFormulation, TapeMachine, TapeParams};

use super::common::{apply_overrides, linear_to_db, load_preset, parse_key_val};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Preset name or TOML file
    #[arg(short, long, value_name = "NAME|FILE")]
    preset: Option<String>,

    /// Override a control, e.g. wow=30 or bump_freq=90Hz (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    params: Vec<(String, String)>,

    /// Machine speed: 7.5ips, 15ips or 30ips
    #[arg(long)]
    speed: Option<MachineSpeed>,

    /// Tape formulation: ferric, chrome or modern
    #[arg(long = "tape", value_name = "FORMULATION")]
    formulation: Option<TapeFormulation>,

    /// Processing block size in frames
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE)]
    block_size: usize,

    /// Output bit depth: 16, 24 (integer) or 32 (float); defaults to the input's
    #[arg(long, value_parser = parse_bit_depth)]
    bit_depth: Option<u16>,

    /// Seed for wow, flutter and hiss; the same seed renders identically
    #[arg(long)]
    seed: Option<u64>,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn parse_bit_depth(s: &str) -> Result<u16, String> {
    match s.trim() {
        "16" => Ok(16),
        "24" => Ok(24),
        "32" => Ok(32),
        other => Err(format!("unsupported bit depth '{other}' (expected 16, 24 or 32)")),
    }
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }

    let (mut channels, spec) = read_wav_channels(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let frames = channels.first().map_or(0, Vec::len);
    println!(
        "Read {}: {} ch, {} Hz, {:.2}s",
        args.input.display(),
        channels.len(),
        spec.sample_rate,
        frames as f64 / f64::from(spec.sample_rate)
    );

    let params = machine_params(&args)?;
    let sample_rate = spec.sample_rate as f32;
    let mut machine = match args.seed {
        Some(seed) => TapeMachine::with_seed(sample_rate, seed),
        None => TapeMachine::from_entropy(sample_rate),
    };
    machine.set_params(&params);
    let params = machine.params();
    println!(
        "Machine: {} {}, saturation {}%, wow {}%, flutter {}%, hiss {}%",
        params.speed,
        params.formulation,
        params.saturation,
        params.wow,
        params.flutter,
        params.hiss
    );

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(frames as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("##-"),
        );
        bar
    };

    let mut engine = RenderEngine::new(machine, args.block_size);
    let stats = engine.render_with_progress(&mut channels, |done, _| {
        progress.set_position(done as u64);
    });
    progress.finish_and_clear();

    println!(
        "Peak: input {:.1} dB, output {:.1} dB ({} blocks)",
        linear_to_db(stats.input_peak),
        linear_to_db(stats.output_peak),
        stats.blocks
    );

    let out_spec = WavSpec {
        bits_per_sample: args.bit_depth.unwrap_or(match spec.bits_per_sample {
            bits @ (16 | 24 | 32) => bits,
            _ => 24,
        }),
        ..spec
    };
    write_wav_channels(&args.output, &channels, out_spec)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    println!("Wrote {}", args.output.display());

    Ok(())
}

/// Preset first, then the `--speed`/`--tape` shortcuts, then `--param`
/// overrides in the order given.
fn machine_params(args: &ProcessArgs) -> anyhow::Result<TapeParams> {
    let mut params = match &args.preset {
        Some(name) => load_preset(name)?.params,
        None => TapeParams::default(),
    };
    if let Some(speed) = args.speed {
        params.speed = speed;
    }
    if let Some(formulation) = args.formulation {
        params.formulation = formulation;
    }
    apply_overrides(&mut params, &args.params)?;
    Ok(params)
}
