//! A control thread and a render thread sharing one synth.

use std::f64::consts::TAU;
use std::sync::Arc;
use std::thread;

use duosynth::{render, ControlMessage, RenderStatus, Synth, VoiceId, Waveform};

const CONTROL_ITERATIONS: usize = 10_000;
const RENDER_BLOCKS: usize = 2_000;

#[test]
fn control_and_render_threads_both_finish() {
    let synth = Arc::new(Synth::default());

    let control = {
        let synth = Arc::clone(&synth);
        thread::spawn(move || {
            let mut hz = 100.0;
            for i in 0..CONTROL_ITERATIONS {
                hz = if hz > 1_000.0 { 100.0 } else { hz + 0.1 };
                let voice = if i % 2 == 0 { VoiceId::One } else { VoiceId::Two };

                synth.set_frequency(voice, hz).unwrap();
                synth.set_amplitude(voice, (i % 10) as f64 / 10.0).unwrap();
                if i % 97 == 0 {
                    synth
                        .apply(ControlMessage::SetWaveform {
                            voice,
                            waveform: Waveform::ALL[i % Waveform::ALL.len()],
                        })
                        .unwrap();
                }
                if i % 13 == 0 {
                    synth.toggle_note(voice).unwrap();
                }
            }
        })
    };

    let render_thread = {
        let synth = Arc::clone(&synth);
        thread::spawn(move || {
            let mut out = [0.0f32; 256];
            for _ in 0..RENDER_BLOCKS {
                assert_eq!(render(&mut out, &synth), RenderStatus::Continue);
                assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
            }
        })
    };

    control.join().expect("control thread panicked");
    render_thread.join().expect("render thread panicked");

    let snapshot = synth.snapshot().unwrap();
    for voice in &snapshot.voices {
        assert!((0.0..TAU).contains(&voice.state.phase));
        assert!((20.0..=20_000.0).contains(&voice.params.frequency));
    }
}

#[test]
fn note_on_survives_a_block_in_flight() {
    let synth = Arc::new(Synth::default());

    let render_thread = {
        let synth = Arc::clone(&synth);
        thread::spawn(move || {
            let mut out = [0.0f32; 64];
            for _ in 0..RENDER_BLOCKS {
                render(&mut out, &synth);
            }
        })
    };

    // A block in flight while note_on lands must not commit its stale idle
    // state over the new note.
    synth.set_release(VoiceId::One, 0.0).unwrap();
    for _ in 0..200 {
        synth.note_off(VoiceId::One).unwrap();
        let mut out = [0.0f32; 4];
        render(&mut out, &synth);

        if synth.note_on(VoiceId::One).unwrap() {
            let snapshot = synth.snapshot().unwrap();
            assert!(snapshot.voices[0].note_active(), "note-on must stick");
        }
    }

    render_thread.join().expect("render thread panicked");
}
