//! Integration tests for the `tapewarm` binary.
//!
//! Every invocation points `TAPEWARM_PRESET_DIR` at a temporary directory so
//! the user's own presets never leak in.

use std::path::Path;
use std::process::{Command, Output};

use tapewarm_config::TapePreset;
use tapewarm_io::{WavSpec, read_wav_channels, write_wav_channels};
use tapewarm_tape::MachineSpeed;
use tempfile::TempDir;

fn tapewarm(preset_dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tapewarm"));
    cmd.env("TAPEWARM_PRESET_DIR", preset_dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_ok(cmd: &mut Command) -> Output {
    let output = cmd.output().expect("failed to run tapewarm");
    assert!(
        output.status.success(),
        "tapewarm failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_stereo_sine(path: &Path, sample_rate: u32, frames: usize) {
    let left: Vec<f32> = (0..frames)
        .map(|i| (std::f32::consts::TAU * 440.0 * i as f32 / sample_rate as f32).sin() * 0.5)
        .collect();
    let right: Vec<f32> = left.iter().map(|s| -s).collect();
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 24,
    };
    write_wav_channels(path, &[left, right], spec).unwrap();
}

// ---------------------------------------------------------------------------
// help, params, info
// ---------------------------------------------------------------------------

#[test]
fn cli_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    let out = stdout(&run_ok(tapewarm(dir.path()).arg("--help")));
    for command in ["process", "presets", "params", "info"] {
        assert!(out.contains(command), "help should mention '{command}': {out}");
    }
}

#[test]
fn cli_params_lists_every_control() {
    let dir = TempDir::new().unwrap();
    let out = stdout(&run_ok(tapewarm(dir.path()).arg("params")));
    for id in [
        "input_drive",
        "saturation",
        "warmth",
        "head_bump",
        "bump_freq",
        "wow",
        "flutter",
        "hiss",
        "output",
        "mix",
        "age",
        "bias",
        "speed",
        "formulation",
    ] {
        assert!(out.contains(id), "params should list '{id}'");
    }
    assert!(out.contains("7.5ips | 15ips | 30ips"), "{out}");
}

#[test]
fn cli_info_shows_wav_metadata() {
    let dir = TempDir::new().unwrap();
    let wav = dir.path().join("tone.wav");
    write_stereo_sine(&wav, 44100, 4410);

    let out = stdout(&run_ok(
        tapewarm(dir.path()).args(["info", wav.to_str().unwrap()]),
    ));
    assert!(out.contains("44100 Hz"), "{out}");
    assert!(out.contains("4410 frames"), "{out}");
}

// ---------------------------------------------------------------------------
// presets
// ---------------------------------------------------------------------------

#[test]
fn cli_presets_lists_factory_and_user() {
    let dir = TempDir::new().unwrap();
    TapePreset::new("Mine")
        .with_description("my own")
        .save(dir.path().join("mine.toml"))
        .unwrap();

    let out = stdout(&run_ok(tapewarm(dir.path()).arg("presets")));
    for name in [
        "Default",
        "Studio 30",
        "Warm Ferric",
        "Chrome Sheen",
        "Worn Cassette",
        "Clean Modern",
    ] {
        assert!(out.contains(name), "missing factory preset '{name}'");
    }
    assert!(out.contains("mine"), "{out}");
    assert!(out.contains("my own"), "{out}");
}

#[test]
fn cli_presets_show_prints_toml() {
    let dir = TempDir::new().unwrap();
    let out = stdout(&run_ok(
        tapewarm(dir.path()).args(["presets", "--show", "Warm Ferric"]),
    ));
    let preset = TapePreset::from_toml(&out).expect("show output should be a preset");
    assert_eq!(preset.name, "Warm Ferric");
    assert_eq!(preset.params.speed, MachineSpeed::Ips7_5);
}

#[test]
fn cli_presets_save_exports_and_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("export").join("studio.toml");
    let target_str = target.to_str().unwrap();

    run_ok(tapewarm(dir.path()).args(["presets", "--save", "studio_30", "--to", target_str]));
    let saved = TapePreset::load(&target).unwrap();
    assert_eq!(saved.name, "Studio 30");

    let again = tapewarm(dir.path())
        .args(["presets", "--save", "studio_30", "--to", target_str])
        .output()
        .unwrap();
    assert!(!again.status.success(), "second save without --force should fail");

    run_ok(tapewarm(dir.path()).args([
        "presets", "--save", "clean_modern", "--to", target_str, "--force",
    ]));
    assert_eq!(TapePreset::load(&target).unwrap().name, "Clean Modern");
}

#[test]
fn cli_presets_unknown_name_fails() {
    let dir = TempDir::new().unwrap();
    let output = tapewarm(dir.path())
        .args(["presets", "--show", "no_such_preset"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no_such_preset"));
}

// ---------------------------------------------------------------------------
// process
// ---------------------------------------------------------------------------

#[test]
fn cli_process_renders_stereo_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_stereo_sine(&input, 48000, 9000);

    let out = stdout(&run_ok(tapewarm(dir.path()).args([
        "process",
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "--preset",
        "Worn Cassette",
        "--param",
        "hiss=5",
        "--block-size",
        "256",
        "--bit-depth",
        "32",
        "--seed",
        "7",
        "--quiet",
    ])));
    assert!(out.contains("Peak: input"), "{out}");

    let (channels, spec) = read_wav_channels(&output).unwrap();
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 48000);
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(channels[0].len(), 9000);
    assert!(channels.iter().flatten().all(|s| s.is_finite() && s.abs() < 2.0));
}

#[test]
fn cli_process_same_seed_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    write_stereo_sine(&input, 44100, 5000);

    let render = |name: &str, seed: &str| {
        let output = dir.path().join(name);
        run_ok(tapewarm(dir.path()).args([
            "process",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--param",
            "wow=60",
            "--param",
            "hiss=40",
            "--speed",
            "7.5ips",
            "--tape",
            "chrome",
            "--seed",
            seed,
            "--quiet",
        ]));
        read_wav_channels(&output).unwrap().0
    };

    let a = render("a.wav", "11");
    let b = render("b.wav", "11");
    let c = render("c.wav", "12");
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn cli_process_keeps_input_bit_depth_by_default() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_stereo_sine(&input, 48000, 1000);

    run_ok(tapewarm(dir.path()).args([
        "process",
        input.to_str().unwrap(),
        output.to_str().unwrap(),
        "--seed",
        "1",
        "--quiet",
    ]));
    let (_, spec) = read_wav_channels(&output).unwrap();
    assert_eq!(spec.bits_per_sample, 24);
}

#[test]
fn cli_process_rejects_bad_arguments() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");
    write_stereo_sine(&input, 48000, 1000);
    let input = input.to_str().unwrap();
    let output = output.to_str().unwrap();

    let cases: [&[&str]; 5] = [
        &["process", input, output, "--param", "sparkle=1"],
        &["process", input, output, "--param", "wow"],
        &["process", input, output, "--speed", "45ips"],
        &["process", input, output, "--bit-depth", "8"],
        &["process", "/nonexistent/tapewarm_input.wav", output],
    ];
    for args in cases {
        let result = tapewarm(dir.path()).args(args).output().unwrap();
        assert!(!result.status.success(), "{args:?} should fail");
    }
}
