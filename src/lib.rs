//! duosynth - a two-voice subtractive synthesizer core.
//!
//! Two oscillator + ADSR voices share one lock-guarded [`Synth`]. A control
//! surface edits parameters and triggers notes through lock-scoped methods,
//! while [`render`] fills audio blocks from a hardware-paced callback: it
//! snapshots both voices under the lock, renders the block with the lock
//! released, then commits the advanced state back.

pub mod dsp; // Envelope, oscillator and mixing primitives
pub mod error;
pub mod preset; // Preset text format and directory store
pub mod synth; // Voices, shared state, render routine, control messages

pub use dsp::oscillator::Waveform;
pub use error::{PresetError, SynthError};
pub use preset::Preset;
pub use synth::{
    render, ControlMessage, RenderStatus, Synth, SynthConfig, SynthSnapshot, Voice, VoiceId,
    VoiceParams,
};

/// Largest block rendered in one pass; device buffers are processed in chunks of this size.
pub const MAX_BLOCK_SIZE: usize = 2048;

/// Sample rate used until the audio device reports its own.
pub const DEFAULT_SAMPLE_RATE: f64 = 44_100.0;

/// Envelope levels at or below this are treated as silence.
pub const SILENCE_EPSILON: f64 = 1e-9;
