use std::sync::Arc;

use serde::Serialize;

use crate::audio::StereoFrame;
use crate::config::{AudioConfig, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::pipeline::{BufferId, CompletionHandle, Handoff, OutputStage, PlaybackDevice};
use crate::processing::SampleProcessor;

/// Lifecycle of a [`Pipeline`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineState {
    /// Constructed, device not initialised yet
    Idle,
    Running,
    /// Device bring-up failed. Terminal until [`Pipeline::reset`].
    Faulted,
}

/// What one [`Pipeline::poll`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollOutcome {
    /// Output frame produced from a pending input frame
    pub processed: Option<StereoFrame>,
    /// Buffer handed to the device
    pub handed_off: Option<BufferId>,
    /// Initial playback was started during this poll
    pub started: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub state: PipelineState,
    pub frames_processed: u64,
    pub sample_overruns: u64,
    pub swap_overruns: u64,
    pub buffers_handed_off: u64,
    pub playback_started: bool,
}

/// Consumer side of the real-time pipeline.
///
/// Owns the processing chain, the double-buffered output stage and the
/// playback device. The producer publishes into the shared [`Handoff`]
/// returned by [`Pipeline::handoff`]; the main loop calls [`Pipeline::poll`]
/// as often as it can. `poll` never blocks.
pub struct Pipeline<D: PlaybackDevice> {
    handoff: Arc<Handoff>,
    processor: SampleProcessor,
    output: OutputStage,
    device: D,
    audio: AudioConfig,
    state: PipelineState,
    frames_processed: u64,
    reported_overruns: u64,
}

impl<D: PlaybackDevice> Pipeline<D> {
    pub fn new(config: &PipelineConfig, device: D) -> Result<Self> {
        config.validate()?;
        Self::with_processor(&config.audio, SampleProcessor::from_config(config), device)
    }

    /// Build around a custom processing chain.
    pub fn with_processor(audio: &AudioConfig, processor: SampleProcessor, device: D) -> Result<Self> {
        Ok(Self {
            handoff: Handoff::new(),
            processor,
            output: OutputStage::new(audio.buffer_size)?,
            device,
            audio: audio.clone(),
            state: PipelineState::Idle,
            frames_processed: 0,
            reported_overruns: 0,
        })
    }

    /// Initialise the playback device. On failure the pipeline enters
    /// [`PipelineState::Faulted`] and stays there.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            PipelineState::Running => return Ok(()),
            PipelineState::Faulted => return Err(PipelineError::Faulted),
            PipelineState::Idle => {}
        }

        let completion = CompletionHandle::new(self.handoff.clone());
        match self.device.init(&self.audio, completion) {
            Ok(()) => {
                self.state = PipelineState::Running;
                log::info!(
                    "Pipeline running at {} Hz, {} frames per buffer",
                    self.audio.sample_rate,
                    self.audio.buffer_size
                );
                Ok(())
            }
            Err(e) => {
                self.state = PipelineState::Faulted;
                log::error!("Playback device init failed, pipeline faulted: {}", e);
                Err(match e {
                    PipelineError::PlaybackInit(msg) => PipelineError::PlaybackInit(msg),
                    other => PipelineError::PlaybackInit(other.to_string()),
                })
            }
        }
    }

    /// One pass of the main loop.
    ///
    /// Hands a ready buffer to the device if it has acked, then processes the
    /// pending input frame (if any) into the active buffer, then tries the
    /// handoff again in case that frame completed a buffer.
    ///
    /// A device error from starting or swapping is returned but is not
    /// fatal: the frame is already stored, the stage stays consistent and
    /// the call is retried on a later poll.
    pub fn poll(&mut self) -> Result<PollOutcome> {
        match self.state {
            PipelineState::Running => {}
            PipelineState::Faulted => return Err(PipelineError::Faulted),
            PipelineState::Idle => return Err(PipelineError::NotStarted),
        }

        let mut outcome = PollOutcome::default();
        let was_started = self.output.started();

        outcome.handed_off = self.output.service(&self.handoff.ack, &mut self.device)?;

        if let Some(frame) = self.handoff.sample.take() {
            let out = self.processor.process(frame);
            let pushed = self.output.push(out.to_output_word(), &mut self.device);
            self.frames_processed += 1;
            outcome.processed = Some(out);
            pushed?;

            if outcome.handed_off.is_none() {
                outcome.handed_off = self.output.service(&self.handoff.ack, &mut self.device)?;
            }
        }

        outcome.started = !was_started && self.output.started();
        self.report_overruns();
        Ok(outcome)
    }

    fn report_overruns(&mut self) {
        let overruns = self.handoff.sample.overruns();
        if overruns > self.reported_overruns {
            log::warn!(
                "{} sample overrun(s), {} total",
                overruns - self.reported_overruns,
                overruns
            );
            self.reported_overruns = overruns;
        }
    }

    /// Re-zero filter, effect, output buffers and the shared handoff. The
    /// device must be started again afterwards.
    pub fn reset(&mut self) {
        self.processor.reset();
        self.output.reset();
        self.handoff.reset();
        self.frames_processed = 0;
        self.reported_overruns = 0;
        self.state = PipelineState::Idle;
    }

    pub fn handoff(&self) -> Arc<Handoff> {
        self.handoff.clone()
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn output(&self) -> &OutputStage {
        &self.output
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn into_device(self) -> D {
        self.device
    }

    pub fn stats(&self) -> PipelineStats {
        PipelineStats {
            state: self.state,
            frames_processed: self.frames_processed,
            sample_overruns: self.handoff.sample.overruns(),
            swap_overruns: self.output.swap_overruns(),
            buffers_handed_off: self.output.handoffs(),
            playback_started: self.output.started(),
        }
    }
}
