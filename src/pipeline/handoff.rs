use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::audio::StereoFrame;

const READY: u64 = 1 << 32;

/// Depth-one single-producer/single-consumer slot for the latest sample pair.
///
/// The packed frame and its ready flag share one 64-bit atomic word, so
/// publishing and taking are each a single read-modify-write. Publishing
/// over an untaken frame replaces it (last write wins) and bumps the overrun
/// counter.
#[derive(Debug, Default)]
pub struct SampleSlot {
    word: AtomicU64,
    overruns: AtomicU64,
}

impl SampleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `frame` and mark it ready. Returns true if an unconsumed frame
    /// was overwritten.
    pub fn publish(&self, frame: StereoFrame) -> bool {
        let prev = self
            .word
            .swap(READY | frame.to_source_word() as u64, Ordering::AcqRel);
        let overran = prev & READY != 0;
        if overran {
            self.overruns.fetch_add(1, Ordering::Relaxed);
        }
        overran
    }

    /// Take the pending frame, clearing the ready flag.
    pub fn take(&self) -> Option<StereoFrame> {
        if self.word.load(Ordering::Acquire) & READY == 0 {
            return None;
        }
        let prev = self.word.fetch_and(!READY, Ordering::AcqRel);
        (prev & READY != 0).then(|| StereoFrame::from_source_word(prev as u32))
    }

    /// Most recently published frame, consumed or not.
    pub fn latest(&self) -> StereoFrame {
        StereoFrame::from_source_word(self.word.load(Ordering::Acquire) as u32)
    }

    pub fn is_ready(&self) -> bool {
        self.word.load(Ordering::Acquire) & READY != 0
    }

    /// Frames overwritten before the consumer took them
    pub fn overruns(&self) -> u64 {
        self.overruns.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.word.store(0, Ordering::Release);
        self.overruns.store(0, Ordering::Relaxed);
    }
}

/// "Previous buffer consumed" flag raised by the playback device.
#[derive(Debug, Default)]
pub struct PlaybackAck(AtomicBool);

impl PlaybackAck {
    pub fn signal(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Consume the flag. Returns whether it was set.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// State shared between the producer, the consumer and the playback device.
#[derive(Debug, Default)]
pub struct Handoff {
    pub sample: SampleSlot,
    pub ack: PlaybackAck,
}

impl Handoff {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reset(&self) {
        self.sample.reset();
        self.ack.clear();
    }
}

/// Handed to a playback device at init so it can report buffer completion.
#[derive(Debug, Clone)]
pub struct CompletionHandle(Arc<Handoff>);

impl CompletionHandle {
    pub fn new(handoff: Arc<Handoff>) -> Self {
        Self(handoff)
    }

    /// The device has finished with the buffer it was last given.
    pub fn signal(&self) {
        self.0.ack.signal();
    }
}
