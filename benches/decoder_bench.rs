//! Criterion benchmarks for the surround decoder.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use surround_upmix::SurroundDecoder;
use surround_upmix::dsp::filter::{FilterCoefficients, FilterState};
use surround_upmix::dsp::phase_shift::PhaseShiftState;

const FRAMES: usize = 1024;

/// Deterministic interleaved stereo noise from a simple LCG.
fn stereo_noise(frames: usize) -> Vec<i16> {
    let mut state: u64 = 0xDEAD_BEEF_CAFE_BABE;
    (0..frames * 2)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            (state >> 48) as i16
        })
        .collect()
}

fn bench_decoder(c: &mut Criterion) {
    let mut group = c.benchmark_group("surround_decoder");
    let input = stereo_noise(FRAMES);
    let mut output = vec![0i16; FRAMES * 6];

    for rate in [44100u32, 48000, 96000] {
        group.bench_function(format!("process_{rate}"), |b| {
            let mut decoder = SurroundDecoder::new(rate).unwrap();
            decoder.reset();
            b.iter(|| {
                decoder.process(black_box(&input), black_box(&mut output), FRAMES);
            });
        });
    }

    group.finish();
}

fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");
    let input: Vec<f32> = stereo_noise(FRAMES).iter().map(|&s| s as f32).collect();

    group.bench_function("lr4_highpass", |b| {
        let coeffs = FilterCoefficients::high_pass(100.0, 48000.0);
        let mut state = FilterState::default();
        b.iter(|| {
            for &x in &input {
                black_box(state.apply(x, &coeffs));
            }
        });
    });

    group.bench_function("phase_shift", |b| {
        let mut ps = PhaseShiftState::new();
        b.iter(|| {
            for &x in &input {
                black_box(ps.apply(x, 48000.0, true));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_decoder, bench_primitives);
criterion_main!(benches);
