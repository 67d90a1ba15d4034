//! Voice summing and block level statistics.

/*
Summing Two Voices
==================

The two voices are mixed by plain addition at equal weight. Each voice is
already scaled by its own envelope (at most its amplitude), so the sum can
reach amplitude₁ + amplitude₂, up to 2.0:

    Voice 1:  [ 0.5,  0.3, -0.5]
    Voice 2:  [ 0.8,  0.2, -0.7]
    Sum:      [ 1.3,  0.5, -1.2]  ← outside [-1, 1]
    Clipped:  [ 1.0,  0.5, -1.0]

Hard clipping keeps the output legal for the device. It distorts only when
both voices are loud and in phase at the same instant; at differing
frequencies that is rare.

Levels
------

  peak  largest |sample| in a block
  rms   sqrt(mean(sample²)), closer to perceived loudness
*/

/// Sum two scaled voice samples and clip to [-1, 1]. A NaN sum is silence.
#[inline]
pub fn mix_and_clip(a: f64, b: f64) -> f32 {
    let sum = a + b;
    if sum.is_nan() {
        return 0.0;
    }
    sum.clamp(-1.0, 1.0) as f32
}

/// Largest absolute sample value.
pub fn peak(buffer: &[f32]) -> f32 {
    buffer.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

/// Root-mean-square level; 0.0 for an empty block.
pub fn rms(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    let sum: f32 = buffer.iter().map(|s| s * s).sum();
    (sum / buffer.len() as f32).sqrt()
}
