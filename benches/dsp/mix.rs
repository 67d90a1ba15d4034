//! Benchmarks for voice summing and level statistics.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duosynth::dsp::mix;

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        // Hot enough that some samples clip
        let signal_a: Vec<f64> = (0..size).map(|i| 0.8 * (i as f64 * 0.1).sin()).collect();
        let signal_b: Vec<f64> = (0..size).map(|i| 0.6 * (i as f64 * 0.15).cos()).collect();
        let mut out = vec![0.0f32; size];

        group.bench_with_input(BenchmarkId::new("mix_and_clip", size), &size, |b, _| {
            b.iter(|| {
                for ((o, &a), &s) in out.iter_mut().zip(&signal_a).zip(&signal_b) {
                    *o = mix::mix_and_clip(black_box(a), black_box(s));
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("peak_rms", size), &size, |b, _| {
            b.iter(|| {
                black_box(mix::peak(black_box(&out)));
                black_box(mix::rms(black_box(&out)));
            })
        });
    }

    group.finish();
}
