// Purpose: the two voices, the lock around them, and the block renderer.
// Control code talks to `Synth`; the audio callback talks to `render`.

pub mod message;
pub mod render;
pub mod shared;
pub mod voice;

pub use message::{ControlMessage, Param};
pub use render::{render, render_interleaved, RenderStatus};
pub use shared::{Synth, SynthConfig, SynthSnapshot};
pub use voice::{Voice, VoiceId, VoiceParams, VoiceState};
