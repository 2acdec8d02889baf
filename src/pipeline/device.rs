use crate::config::AudioConfig;
use crate::error::{PipelineError, Result};
use crate::pipeline::CompletionHandle;

/// DMA-driven audio output, seen from the pipeline.
///
/// Buffers are packed output words (left in the high 16 bits). The device
/// copies or otherwise takes the contents during the call; the pipeline may
/// start overwriting the slice as soon as the call returns. When the device
/// has consumed a buffer it calls [`CompletionHandle::signal`].
pub trait PlaybackDevice {
    /// Bring up the output path. An error here is fatal for the pipeline.
    fn init(&mut self, audio: &AudioConfig, completion: CompletionHandle) -> Result<()>;

    /// Start playback with the first buffer. Called once it succeeds; a
    /// failed start is retried on the next pair of full buffers.
    fn play(&mut self, buffer: &[u32]) -> Result<()>;

    /// Queue the next buffer after a completion.
    fn change_buffer(&mut self, buffer: &[u32]) -> Result<()>;
}

/// One call made on a [`RecordingDevice`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCall {
    Init { sample_rate: u32, volume: u8 },
    Play(Vec<u32>),
    ChangeBuffer(Vec<u32>),
}

/// Device that records every call and never completes on its own.
///
/// Completion is driven by the test through [`RecordingDevice::complete`].
#[derive(Debug, Default)]
pub struct RecordingDevice {
    calls: Vec<DeviceCall>,
    completion: Option<CompletionHandle>,
    fail_init: bool,
    fail_play: bool,
    fail_change_buffer: bool,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device whose `init` always fails.
    pub fn failing() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    /// Make `play` fail until switched off again.
    pub fn set_fail_play(&mut self, fail: bool) {
        self.fail_play = fail;
    }

    /// Make `change_buffer` fail until switched off again.
    pub fn set_fail_change_buffer(&mut self, fail: bool) {
        self.fail_change_buffer = fail;
    }

    pub fn calls(&self) -> &[DeviceCall] {
        &self.calls
    }

    /// Buffers handed over so far, in order, from `play` and `change_buffer`.
    pub fn buffers(&self) -> Vec<&[u32]> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DeviceCall::Play(b) | DeviceCall::ChangeBuffer(b) => Some(b.as_slice()),
                DeviceCall::Init { .. } => None,
            })
            .collect()
    }

    pub fn play_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::Play(_)))
            .count()
    }

    /// Report the current buffer as consumed.
    pub fn complete(&self) {
        if let Some(completion) = &self.completion {
            completion.signal();
        }
    }
}

impl PlaybackDevice for RecordingDevice {
    fn init(&mut self, audio: &AudioConfig, completion: CompletionHandle) -> Result<()> {
        self.calls.push(DeviceCall::Init {
            sample_rate: audio.sample_rate,
            volume: audio.volume,
        });
        if self.fail_init {
            return Err(PipelineError::PlaybackInit("codec did not respond".into()));
        }
        self.completion = Some(completion);
        Ok(())
    }

    fn play(&mut self, buffer: &[u32]) -> Result<()> {
        if self.fail_play {
            return Err(PipelineError::PlaybackDevice("DMA start rejected".into()));
        }
        self.calls.push(DeviceCall::Play(buffer.to_vec()));
        Ok(())
    }

    fn change_buffer(&mut self, buffer: &[u32]) -> Result<()> {
        if self.fail_change_buffer {
            return Err(PipelineError::PlaybackDevice("DMA swap rejected".into()));
        }
        self.calls.push(DeviceCall::ChangeBuffer(buffer.to_vec()));
        Ok(())
    }
}
