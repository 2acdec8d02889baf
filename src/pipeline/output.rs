//! Double-buffered output stage.
//!
//! Two fixed-capacity buffers alternate: one is filled sample by sample while
//! the other is queued on, or being played by, the playback device.
//!
//! Per slot:
//! - `Filling`: the active slot, receiving samples.
//! - `Ready`: full, waiting for a playback ack before handoff.
//! - `InFlight`: handed to the device.
//! - `Idle`: never filled yet, or played out.
//!
//! Playback only starts once both slots have been filled. The check runs at
//! the instant the second buffer completes, before the stage flips back to
//! the first slot, and steady-state handoffs are disabled until then.

use crate::error::{PipelineError, Result};
use crate::pipeline::{PlaybackAck, PlaybackDevice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferId {
    A,
    B,
}

impl BufferId {
    pub fn other(self) -> Self {
        match self {
            BufferId::A => BufferId::B,
            BufferId::B => BufferId::A,
        }
    }

    fn index(self) -> usize {
        match self {
            BufferId::A => 0,
            BufferId::B => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Idle,
    Filling,
    Ready,
    InFlight,
}

pub struct OutputStage {
    buffers: [Vec<u32>; 2],
    states: [SlotState; 2],
    active: BufferId,
    fill_index: usize,
    started: bool,
    swap_overruns: u64,
    handoffs: u64,
}

impl OutputStage {
    /// Allocate both buffers up front. Nothing allocates after this.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(PipelineError::InvalidBufferSize(capacity));
        }
        Ok(Self {
            buffers: [vec![0; capacity], vec![0; capacity]],
            states: [SlotState::Filling, SlotState::Idle],
            active: BufferId::A,
            fill_index: 0,
            started: false,
            swap_overruns: 0,
            handoffs: 0,
        })
    }

    /// Append one output word to the active buffer.
    ///
    /// Completing a buffer marks it ready, starts playback if both buffers
    /// are now ready, and flips to the other slot. The flip happens even when
    /// starting playback fails, so the stage stays writable and the start is
    /// retried the next time both buffers are ready.
    pub fn push(&mut self, word: u32, device: &mut dyn PlaybackDevice) -> Result<()> {
        self.buffers[self.active.index()][self.fill_index] = word;
        self.fill_index += 1;

        if self.fill_index == self.capacity() {
            self.complete_active(device)?;
        }
        Ok(())
    }

    fn complete_active(&mut self, device: &mut dyn PlaybackDevice) -> Result<()> {
        let done = self.active;
        self.set_state(done, SlotState::Ready);
        log::debug!("Buffer {:?} full", done);

        let started = if !self.started && self.is_ready(BufferId::A) && self.is_ready(BufferId::B)
        {
            self.start(device)
        } else {
            Ok(())
        };

        let next = done.other();
        if self.state(next) == SlotState::Ready {
            // Refilling a buffer that never reached the device.
            self.swap_overruns += 1;
            log::warn!(
                "Buffer swap overrun: {:?} refilled before handoff ({} total)",
                next,
                self.swap_overruns
            );
        }
        self.set_state(next, SlotState::Filling);
        self.active = next;
        self.fill_index = 0;
        started
    }

    fn start(&mut self, device: &mut dyn PlaybackDevice) -> Result<()> {
        if let Err(e) = device.play(self.buffer(BufferId::A)) {
            log::warn!("Playback start failed, retrying on next full pair: {}", e);
            return Err(e);
        }
        self.set_state(BufferId::A, SlotState::InFlight);
        self.started = true;
        self.handoffs += 1;
        log::info!("Playback started ({} frames per buffer)", self.capacity());
        Ok(())
    }

    /// Hand the ready buffer to the device if it has acknowledged the
    /// previous one. The ack is only consumed when a buffer is handed off.
    pub fn service(
        &mut self,
        ack: &PlaybackAck,
        device: &mut dyn PlaybackDevice,
    ) -> Result<Option<BufferId>> {
        if !self.started {
            return Ok(None);
        }

        let id = self.active.other();
        if self.state(id) != SlotState::Ready || !ack.take() {
            return Ok(None);
        }

        if let Err(e) = device.change_buffer(self.buffer(id)) {
            // Leave the buffer ready and the ack raised for the next pass.
            ack.signal();
            log::warn!("Buffer {:?} handoff failed: {}", id, e);
            return Err(e);
        }

        self.set_state(id, SlotState::InFlight);
        self.handoffs += 1;
        log::debug!("Buffer {:?} handed off", id);
        Ok(Some(id))
    }

    pub fn capacity(&self) -> usize {
        self.buffers[0].len()
    }

    pub fn buffer(&self, id: BufferId) -> &[u32] {
        &self.buffers[id.index()]
    }

    pub fn state(&self, id: BufferId) -> SlotState {
        self.states[id.index()]
    }

    pub fn is_ready(&self, id: BufferId) -> bool {
        self.state(id) == SlotState::Ready
    }

    fn set_state(&mut self, id: BufferId, state: SlotState) {
        self.states[id.index()] = state;
    }

    pub fn active(&self) -> BufferId {
        self.active
    }

    pub fn fill_index(&self) -> usize {
        self.fill_index
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Buffers refilled before they were handed to the device
    pub fn swap_overruns(&self) -> u64 {
        self.swap_overruns
    }

    /// Buffers handed to the device, including the initial play
    pub fn handoffs(&self) -> u64 {
        self.handoffs
    }

    pub fn reset(&mut self) {
        for buffer in &mut self.buffers {
            buffer.fill(0);
        }
        self.states = [SlotState::Filling, SlotState::Idle];
        self.active = BufferId::A;
        self.fill_index = 0;
        self.started = false;
        self.swap_overruns = 0;
        self.handoffs = 0;
    }
}
