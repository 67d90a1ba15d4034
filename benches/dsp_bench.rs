//! Benchmarks for DSP primitives and the full render cycle.
//!
//! Run with: cargo bench
//!
//! Reference timing at 44.1kHz sample rate:
//!   - 64 samples  = 1.45ms deadline
//!   - 128 samples = 2.90ms deadline
//!   - 256 samples = 5.80ms deadline
//!   - 512 samples = 11.61ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Envelope stepping, oscillator evaluation, mixing
//!   - scenarios/*  Whole blocks through `render`, with and without a busy control thread

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

criterion_group!(
    benches,
    dsp::bench_envelope,
    dsp::bench_oscillator,
    dsp::bench_mix,
    scenarios::bench_render,
);
criterion_main!(benches);
