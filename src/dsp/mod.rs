//! Low-level DSP primitives used by the voices.
//!
//! Everything here is allocation-free and realtime-safe: plain functions and
//! `Copy` state that the render routine can snapshot and step without locks.

/// Time-in-stage ADSR envelope state machine.
pub mod envelope;
/// Summing, clipping and block level statistics.
pub mod mix;
/// Stateless waveform generation and phase accumulation.
pub mod oscillator;

pub use envelope::{envelope_level, Adsr, EnvelopeStage, EnvelopeState};
pub use oscillator::Waveform;
