//! Error types for the synth core and the preset layer.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to reach the shared synth state.
///
/// The only way a `std::sync::Mutex` fails is poisoning: some thread panicked
/// while holding the lock, so the voices may be half-written. The render
/// routine treats this as fatal for the stream; control calls surface it.
#[derive(Error, Debug)]
pub enum SynthError {
    #[error("synth state lock is poisoned")]
    LockPoisoned,
}

#[derive(Error, Debug)]
pub enum PresetError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: invalid value '{value}' for {key}")]
    InvalidValue {
        key: &'static str,
        line: usize,
        value: String,
    },
    #[error("line {line}: waveform index {index} is out of range")]
    InvalidWaveform { line: usize, index: i64 },
    #[error("preset is missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl PresetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
