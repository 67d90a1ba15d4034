//! Benchmarks for oscillator waveform evaluation plus phase accumulation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duosynth::dsp::oscillator::{advance_phase, phase_increment, Waveform};

use crate::BLOCK_SIZES;

fn render(waveform: Waveform, phase: &mut f64, increment: f64, buffer: &mut [f64]) {
    for sample in buffer.iter_mut() {
        *sample = waveform.sample(*phase);
        *phase = advance_phase(*phase, increment);
    }
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let increment = phase_increment(440.0, 44_100.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];

        // Sine: one sin() per sample
        // Square: sin() plus a branch
        // Sawtooth: rem_euclid, no transcendental
        // Triangle: sin() and asin()
        for waveform in Waveform::ALL {
            let mut phase = 0.0;
            group.bench_with_input(
                BenchmarkId::new(waveform.name().to_lowercase(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        render(
                            black_box(waveform),
                            black_box(&mut phase),
                            black_box(increment),
                            black_box(&mut buffer),
                        );
                    })
                },
            );
        }
    }

    group.finish();
}
