use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Sender, TrySendError};

use super::StereoFrame;
use crate::config::AudioConfig;
use crate::error::{PipelineError, Result};
use crate::pipeline::{CompletionHandle, PlaybackDevice};
use crate::signal_processing::q15;

/// Plays output buffers on the default host output device.
///
/// Buffers travel to the stream callback over a small channel. The callback
/// signals completion each time it plays the last frame of a buffer and
/// outputs silence while nothing is queued.
pub struct CpalDevice {
    tx: Option<Sender<Vec<u32>>>,
    stream: Option<cpal::Stream>,
}

impl CpalDevice {
    pub fn new() -> Self {
        Self {
            tx: None,
            stream: None,
        }
    }

    fn queue(&mut self, buffer: &[u32]) -> Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| PipelineError::PlaybackDevice("device not initialized".into()))?;
        match tx.try_send(buffer.to_vec()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(PipelineError::PlaybackDevice(
                "output queue full".into(),
            )),
            Err(TrySendError::Disconnected(_)) => Err(PipelineError::PlaybackDevice(
                "output stream stopped".into(),
            )),
        }
    }
}

impl Default for CpalDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackDevice for CpalDevice {
    fn init(&mut self, audio: &AudioConfig, completion: CompletionHandle) -> Result<()> {
        let host = cpal::default_host();

        let device = host
            .default_output_device()
            .ok_or_else(|| PipelineError::PlaybackInit("No output device found".into()))?;

        match device.description() {
            Ok(desc) => log::info!("Output device: {:?}", desc),
            Err(_) => log::info!("Output device: Unknown"),
        }

        let stream_config = cpal::StreamConfig {
            channels: 2,
            sample_rate: audio.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let (tx, rx) = crossbeam_channel::bounded::<Vec<u32>>(2);
        let mut current: Vec<u32> = Vec::new();
        let mut pos = 0usize;
        let gain = audio.volume as f32 / 100.0;

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for out in data.chunks_exact_mut(2) {
                        if pos == current.len() {
                            match rx.try_recv() {
                                Ok(next) => {
                                    current = next;
                                    pos = 0;
                                }
                                Err(_) => {
                                    out.fill(0.0);
                                    continue;
                                }
                            }
                        }
                        let frame = StereoFrame::from_output_word(current[pos]);
                        out[0] = q15::to_f32(frame.left) * gain;
                        out[1] = q15::to_f32(frame.right) * gain;
                        pos += 1;
                        if pos == current.len() {
                            completion.signal();
                        }
                    }
                },
                |err| log::error!("Output stream error: {}", err),
                None,
            )
            .map_err(|e| PipelineError::PlaybackInit(format!("{}", e)))?;

        self.tx = Some(tx);
        self.stream = Some(stream);
        Ok(())
    }

    fn play(&mut self, buffer: &[u32]) -> Result<()> {
        self.queue(buffer)?;
        if let Some(stream) = &self.stream {
            stream
                .play()
                .map_err(|e| PipelineError::PlaybackDevice(format!("{}", e)))?;
        }
        Ok(())
    }

    fn change_buffer(&mut self, buffer: &[u32]) -> Result<()> {
        self.queue(buffer)
    }
}

impl Drop for CpalDevice {
    fn drop(&mut self) {
        if let Some(stream) = &self.stream {
            let _ = stream.pause();
        }
    }
}
