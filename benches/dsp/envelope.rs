//! Benchmarks for the time-in-stage ADSR envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use duosynth::dsp::envelope::{Adsr, EnvelopeStage, EnvelopeState};

use crate::BLOCK_SIZES;

const DT: f64 = 1.0 / 44_100.0;

fn step_block(env: &mut EnvelopeState, adsr: &Adsr, buffer: &mut [f64]) {
    for level in buffer.iter_mut() {
        *level = env.step(adsr, DT);
    }
}

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");
    let adsr = Adsr {
        amplitude: 0.8,
        attack: 100.0,
        decay: 100.0,
        sustain: 0.7,
        release: 100.0,
    };

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f64; size];

        // Long stages so the benchmark never leaves the stage under test
        for stage in [
            EnvelopeStage::Attack,
            EnvelopeStage::Decay,
            EnvelopeStage::Sustain,
            EnvelopeStage::Release,
        ] {
            let mut env = EnvelopeState {
                stage,
                last_value: 0.5,
                note_active: true,
                ..Default::default()
            };
            group.bench_with_input(
                BenchmarkId::new(stage.name().to_lowercase(), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        env.time_in_stage = 0.0;
                        step_block(black_box(&mut env), black_box(&adsr), black_box(&mut buffer));
                    })
                },
            );
        }
    }

    group.finish();
}
