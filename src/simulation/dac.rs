use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Sender, TrySendError};

use crate::config::AudioConfig;
use crate::error::{PipelineError, Result};
use crate::pipeline::{CompletionHandle, PlaybackDevice};

/// Tick-driven stand-in for the DMA/DAC output path.
///
/// Plays one frame of its current buffer per [`SimulatedDac::tick`] and
/// signals completion when it plays the last one. Once playback has started,
/// a tick with nothing left to play is an underrun and outputs silence.
#[derive(Default)]
pub struct SimulatedDac {
    completion: Option<CompletionHandle>,
    current: Vec<u32>,
    pos: usize,
    playing: bool,
    played: Vec<u32>,
    underruns: u64,
}

impl SimulatedDac {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the DAC by one sample period.
    pub fn tick(&mut self) {
        if !self.playing {
            return;
        }

        if self.pos < self.current.len() {
            self.played.push(self.current[self.pos]);
            self.pos += 1;
            if self.pos == self.current.len() {
                if let Some(completion) = &self.completion {
                    completion.signal();
                }
            }
        } else {
            self.underruns += 1;
            self.played.push(0);
        }
    }

    fn load(&mut self, buffer: &[u32]) {
        self.current.clear();
        self.current.extend_from_slice(buffer);
        self.pos = 0;
    }

    /// Every output word played so far, silence included
    pub fn played(&self) -> &[u32] {
        &self.played
    }

    pub fn underruns(&self) -> u64 {
        self.underruns
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}

impl PlaybackDevice for SimulatedDac {
    fn init(&mut self, _audio: &AudioConfig, completion: CompletionHandle) -> Result<()> {
        self.completion = Some(completion);
        Ok(())
    }

    fn play(&mut self, buffer: &[u32]) -> Result<()> {
        self.load(buffer);
        self.playing = true;
        Ok(())
    }

    fn change_buffer(&mut self, buffer: &[u32]) -> Result<()> {
        self.load(buffer);
        Ok(())
    }
}

/// Wall-clock playback device backed by a worker thread.
///
/// Each handed-off buffer is "played" by sleeping for one buffer duration,
/// then recorded and acknowledged.
pub struct ThreadedDac {
    buffer_duration: Duration,
    tx: Option<Sender<Vec<u32>>>,
    worker: Option<JoinHandle<Vec<u32>>>,
}

impl ThreadedDac {
    pub fn new(buffer_duration: Duration) -> Self {
        Self {
            buffer_duration,
            tx: None,
            worker: None,
        }
    }

    fn queue(&mut self, buffer: &[u32]) -> Result<()> {
        let tx = self
            .tx
            .as_ref()
            .ok_or_else(|| PipelineError::PlaybackDevice("device not initialized".into()))?;
        tx.try_send(buffer.to_vec()).map_err(|e| match e {
            TrySendError::Full(_) => PipelineError::PlaybackDevice("output queue full".into()),
            TrySendError::Disconnected(_) => {
                PipelineError::PlaybackDevice("playback worker stopped".into())
            }
        })
    }

    /// Stop the worker once it has drained its queue and return every word
    /// it played.
    pub fn finish(&mut self) -> Vec<u32> {
        self.tx = None;
        match self.worker.take() {
            Some(worker) => worker.join().unwrap_or_else(|_| {
                log::error!("Playback worker panicked");
                Vec::new()
            }),
            None => Vec::new(),
        }
    }
}

impl PlaybackDevice for ThreadedDac {
    fn init(&mut self, _audio: &AudioConfig, completion: CompletionHandle) -> Result<()> {
        let (tx, rx) = crossbeam_channel::bounded::<Vec<u32>>(2);
        let buffer_duration = self.buffer_duration;

        let worker = std::thread::Builder::new()
            .name("playback".into())
            .spawn(move || {
                let mut played = Vec::new();
                for buffer in rx.iter() {
                    std::thread::sleep(buffer_duration);
                    played.extend_from_slice(&buffer);
                    completion.signal();
                }
                played
            })
            .map_err(|e| PipelineError::PlaybackInit(e.to_string()))?;

        self.tx = Some(tx);
        self.worker = Some(worker);
        Ok(())
    }

    fn play(&mut self, buffer: &[u32]) -> Result<()> {
        self.queue(buffer)
    }

    fn change_buffer(&mut self, buffer: &[u32]) -> Result<()> {
        self.queue(buffer)
    }
}

impl Drop for ThreadedDac {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Handoff;

    #[test]
    fn test_plays_one_frame_per_tick_and_acks_at_end() {
        let handoff = Handoff::new();
        let mut dac = SimulatedDac::new();
        dac.init(&AudioConfig::default(), CompletionHandle::new(handoff.clone()))
            .unwrap();

        dac.tick();
        assert!(dac.played().is_empty());

        dac.play(&[1, 2]).unwrap();
        dac.tick();
        assert!(!handoff.ack.is_set());
        dac.tick();
        assert!(handoff.ack.is_set());
        assert_eq!(dac.played(), &[1, 2]);

        dac.tick();
        assert_eq!(dac.underruns(), 1);
        assert_eq!(dac.played(), &[1, 2, 0]);
    }

    #[test]
    fn test_threaded_dac_plays_queued_buffers() {
        let handoff = Handoff::new();
        let mut dac = ThreadedDac::new(Duration::from_millis(1));
        dac.init(&AudioConfig::default(), CompletionHandle::new(handoff.clone()))
            .unwrap();

        dac.play(&[1, 2]).unwrap();
        dac.change_buffer(&[3]).unwrap();
        assert_eq!(dac.finish(), vec![1, 2, 3]);
        assert!(handoff.ack.is_set());
    }

    #[test]
    fn test_threaded_dac_requires_init() {
        let mut dac = ThreadedDac::new(Duration::from_millis(1));
        assert!(dac.play(&[1]).is_err());
    }
}
