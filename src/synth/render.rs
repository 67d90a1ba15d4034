//! Block renderer: snapshot under the lock, compute without it, commit.

use tracing::error;

use crate::dsp::mix::mix_and_clip;
use crate::dsp::oscillator::phase_increment;
use crate::synth::shared::Synth;

/*
Render Cycle
============

The audio callback must never wait on the control thread for longer than it
takes to copy a few dozen numbers. So each block touches the lock exactly
twice, and neither critical section depends on block length:

    control thread     ──set──┐        ┌──note_on──┐
                              ▼        ▼           │
    lock          ────[snapshot]────────────────[commit]────
                          │                        ▲
    render thread         └── per-sample loop ─────┘
                              (lock released)

  1. snapshot  copy both voices, their generations and the sample rate
  2. loop      step envelope, evaluate oscillator, scale, mix and clip
  3. commit    write back phase, stage, time_in_stage and note_active

Parameter edits that land during step 2 are picked up by the next block.
A note transition that lands during step 2 bumps the voice's generation, and
step 3 leaves that voice alone rather than overwrite the transition.

A poisoned lock means the control side panicked inside a critical section.
The block is filled with silence and the caller is told to stop the stream.
*/

/// Outcome of rendering one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStatus {
    Continue,
    Abort,
}

/// Fill `out` with mono samples in [-1, 1].
pub fn render(out: &mut [f32], synth: &Synth) -> RenderStatus {
    let (mut voices, generations, sample_rate) = match synth.lock() {
        Ok(state) => (state.voices, state.generations, state.sample_rate),
        Err(err) => {
            out.fill(0.0);
            error!(%err, "render snapshot failed, aborting stream");
            return RenderStatus::Abort;
        }
    };

    let dt = 1.0 / sample_rate;
    let increments = voices.map(|v| phase_increment(v.params.frequency, sample_rate));

    let [one, two] = &mut voices;
    for sample in out.iter_mut() {
        let a = one.next_sample(dt, increments[0]);
        let b = two.next_sample(dt, increments[1]);
        *sample = mix_and_clip(a, b);
    }

    match synth.lock() {
        Ok(mut state) => {
            state.commit(&voices, &generations);
            RenderStatus::Continue
        }
        Err(err) => {
            error!(%err, "render commit failed, voice state lost, aborting stream");
            RenderStatus::Abort
        }
    }
}

/// Render into an interleaved device buffer, duplicating mono across `channels`.
///
/// Works through `out` in chunks of `scratch.len()` frames, handing every
/// mono chunk to `tap` before it is spread over the channels. After an abort
/// the rest of `out` is silenced.
pub fn render_interleaved(
    out: &mut [f32],
    channels: usize,
    synth: &Synth,
    scratch: &mut [f32],
    mut tap: impl FnMut(&[f32]),
) -> RenderStatus {
    let channels = channels.max(1);
    if scratch.is_empty() {
        out.fill(0.0);
        return RenderStatus::Continue;
    }

    let total_frames = out.len() / channels;
    let mut frames_written = 0;

    while frames_written < total_frames {
        let frames_to_render = (total_frames - frames_written).min(scratch.len());
        let block = &mut scratch[..frames_to_render];
        let status = render(block, synth);
        tap(block);

        let out_off = frames_written * channels;
        let frames = out[out_off..out_off + frames_to_render * channels].chunks_exact_mut(channels);
        for (frame, &s) in frames.zip(block.iter()) {
            frame.fill(s);
        }
        frames_written += frames_to_render;

        if status == RenderStatus::Abort {
            out[frames_written * channels..].fill(0.0);
            return RenderStatus::Abort;
        }
    }

    // Trailing partial frame, if the device handed us one.
    out[total_frames * channels..].fill(0.0);
    RenderStatus::Continue
}

impl Synth {
    /// Method form of [`render`].
    pub fn render_block(&self, out: &mut [f32]) -> RenderStatus {
        render(out, self)
    }
}
