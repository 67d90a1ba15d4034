//! cpal output stream driving the synth's block renderer.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use color_eyre::eyre::{bail, eyre, Result as EyreResult, WrapErr};
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    SampleFormat,
};
use rtrb::Producer;
use tracing::{error, info, warn};

use duosynth::{
    synth::{render_interleaved, RenderStatus},
    Synth, MAX_BLOCK_SIZE,
};

/// The open output stream plus its abort flag.
pub struct AudioOutput {
    stream: Option<cpal::Stream>,
    aborted: Arc<AtomicBool>,
    sample_rate: u32,
    channels: u16,
}

impl AudioOutput {
    /// Open the default device and start rendering `synth` into it.
    ///
    /// Every rendered mono sample is also offered to `scope_tx`; when the ring
    /// is full the rest of the block is dropped.
    pub fn start(synth: Arc<Synth>, mut scope_tx: Producer<f32>) -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        if config.sample_format() != SampleFormat::F32 {
            bail!("unsupported output sample format {:?}", config.sample_format());
        }

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();
        synth.set_sample_rate(f64::from(sample_rate))?;

        let aborted = Arc::new(AtomicBool::new(false));
        let abort_flag = Arc::clone(&aborted);
        let frame_channels = channels as usize;
        let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if abort_flag.load(Ordering::Acquire) {
                        data.fill(0.0);
                        return;
                    }

                    let status =
                        render_interleaved(data, frame_channels, &synth, &mut scratch, |block| {
                            for &sample in block {
                                if scope_tx.push(sample).is_err() {
                                    break;
                                }
                            }
                        });

                    if status == RenderStatus::Abort {
                        abort_flag.store(true, Ordering::Release);
                    }
                },
                |err| error!(%err, "audio stream error"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;
        info!(sample_rate, channels, "audio stream started");

        Ok(Self {
            stream: Some(stream),
            aborted,
            sample_rate,
            channels,
        })
    }

    /// Pause and drop the stream. Safe to call more than once.
    pub fn stop(&mut self) {
        let Some(stream) = self.stream.take() else {
            return;
        };
        if let Err(err) = stream.pause() {
            warn!(%err, "failed to pause output stream");
        }
        drop(stream);
        info!("audio stream stopped");
    }

    /// True once a render block reported [`RenderStatus::Abort`].
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stop();
    }
}
