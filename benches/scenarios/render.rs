//! Benchmarks for the snapshot / compute / commit render cycle.
//!
//! `idle` and `two_voices` measure the cycle alone; `two_voices_contended` keeps a control
//! thread hammering the setters so lock acquisition is part of the cost.

use std::{
    hint::black_box,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use criterion::{BenchmarkId, Criterion};
use duosynth::{render, Synth, VoiceId};

use crate::BLOCK_SIZES;

fn sounding_synth() -> Synth {
    let synth = Synth::default();
    synth.set_attack(VoiceId::One, 0.0).unwrap();
    synth.set_attack(VoiceId::Two, 0.0).unwrap();
    synth.note_on(VoiceId::One).unwrap();
    synth.note_on(VoiceId::Two).unwrap();
    synth
}

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/render");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let idle = Synth::default();
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| render(black_box(&mut buffer), black_box(&idle)))
        });

        let sustaining = sounding_synth();
        group.bench_with_input(BenchmarkId::new("two_voices", size), &size, |b, _| {
            b.iter(|| render(black_box(&mut buffer), black_box(&sustaining)))
        });

        let contended = Arc::new(sounding_synth());
        let stop = Arc::new(AtomicBool::new(false));
        let control = {
            let synth = Arc::clone(&contended);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut hz = 220.0;
                while !stop.load(Ordering::Relaxed) {
                    hz = if hz > 880.0 { 220.0 } else { hz + 1.0 };
                    let _ = synth.set_frequency(VoiceId::One, hz);
                }
            })
        };
        group.bench_with_input(BenchmarkId::new("two_voices_contended", size), &size, |b, _| {
            b.iter(|| render(black_box(&mut buffer), black_box(&contended)))
        });
        stop.store(true, Ordering::Relaxed);
        let _ = control.join();
    }

    group.finish();
}
