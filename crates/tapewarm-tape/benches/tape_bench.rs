//! Criterion benchmarks for the tape machine
//!
//! Run with: cargo bench -p tapewarm-tape
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use tapewarm_tape::{MachineSpeed, TapeFormulation, TapeMachine};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_machine(c: &mut Criterion, name: &str, mut machine: TapeMachine) {
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    machine.process(black_box(&mut [&mut left[..], &mut right[..]]));
                    black_box(left[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_default(c: &mut Criterion) {
    bench_machine(c, "TapeMachine/default", TapeMachine::with_seed(SAMPLE_RATE, 1));
}

fn bench_everything_on(c: &mut Criterion) {
    let mut machine = TapeMachine::with_seed(SAMPLE_RATE, 1);
    machine.set_wow(40.0);
    machine.set_flutter(30.0);
    machine.set_hiss(25.0);
    machine.set_age(50.0);
    machine.set_mix(80.0);
    bench_machine(c, "TapeMachine/full", machine);
}

fn bench_formulations(c: &mut Criterion) {
    for formulation in TapeFormulation::ALL {
        let mut machine = TapeMachine::with_seed(SAMPLE_RATE, 1);
        machine.set_formulation(formulation);
        machine.set_speed(MachineSpeed::Ips30);
        machine.set_saturation(80.0);
        bench_machine(c, &format!("TapeMachine/{}", formulation.name()), machine);
    }
}

fn bench_param_sweep(c: &mut Criterion) {
    let mut machine = TapeMachine::with_seed(SAMPLE_RATE, 1);
    let mut block = generate_test_signal(512);
    let mut warmth = 0.0;

    c.bench_function("TapeMachine/warmth_sweep_512", |b| {
        b.iter(|| {
            warmth = (warmth + 1.0) % 100.0;
            machine.set_warmth(black_box(warmth));
            machine.process(&mut [&mut block[..]]);
            black_box(block[0])
        })
    });
}

criterion_group!(
    benches,
    bench_default,
    bench_everything_on,
    bench_formulations,
    bench_param_sweep
);
criterion_main!(benches);
