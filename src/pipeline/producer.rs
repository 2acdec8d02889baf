use std::sync::Arc;

use crate::audio::AudioSource;
use crate::pipeline::Handoff;

/// Result of one producer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A new frame is waiting for the consumer
    Published,
    /// A new frame replaced one the consumer never took
    Overrun,
    /// The source has no frames
    SourceEmpty,
}

/// Timer-side half of the pipeline.
///
/// Each tick reads the frame under the cursor, advances the cursor (wrapping
/// to 0 at the end of the source for loop playback) and publishes the frame.
/// Never blocks.
pub struct SampleProducer<S: AudioSource> {
    source: S,
    cursor: usize,
    handoff: Arc<Handoff>,
}

impl<S: AudioSource> SampleProducer<S> {
    pub fn new(source: S, handoff: Arc<Handoff>) -> Self {
        Self {
            source,
            cursor: 0,
            handoff,
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        let Some(frame) = self.source.frame(self.cursor) else {
            return TickOutcome::SourceEmpty;
        };

        self.cursor += 1;
        if self.cursor >= self.source.len() {
            self.cursor = 0;
        }

        if self.handoff.sample.publish(frame) {
            log::trace!("Sample overrun at cursor {}", self.cursor);
            TickOutcome::Overrun
        } else {
            TickOutcome::Published
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Rewind to the start of the source.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{PackedSource, StereoFrame};

    #[test]
    fn test_cursor_wraps() {
        let handoff = Handoff::new();
        let mut producer = SampleProducer::new(PackedSource::from_mono(&[1, 2, 3]), handoff.clone());

        let mut seen = Vec::new();
        for _ in 0..7 {
            assert_eq!(producer.tick(), TickOutcome::Published);
            seen.push(handoff.sample.take().unwrap().left);
        }
        assert_eq!(seen, vec![1, 2, 3, 1, 2, 3, 1]);
        assert_eq!(producer.cursor(), 1);
    }

    #[test]
    fn test_empty_source_publishes_nothing() {
        let handoff = Handoff::new();
        let mut producer = SampleProducer::new(PackedSource::from_words(Vec::new()), handoff.clone());

        assert_eq!(producer.tick(), TickOutcome::SourceEmpty);
        assert!(!handoff.sample.is_ready());
    }

    #[test]
    fn test_overrun_reported() {
        let handoff = Handoff::new();
        let frames = [StereoFrame::new(1, 10), StereoFrame::new(2, 20)];
        let mut producer = SampleProducer::new(PackedSource::from_frames(&frames), handoff.clone());

        assert_eq!(producer.tick(), TickOutcome::Published);
        assert_eq!(producer.tick(), TickOutcome::Overrun);
        assert_eq!(handoff.sample.take(), Some(StereoFrame::new(2, 20)));
        assert_eq!(handoff.sample.overruns(), 1);
    }

    #[test]
    fn test_reset_rewinds() {
        let handoff = Handoff::new();
        let mut producer = SampleProducer::new(PackedSource::from_mono(&[7, 8]), handoff.clone());
        producer.tick();
        producer.reset();
        handoff.sample.take();
        producer.tick();
        assert_eq!(handoff.sample.take().map(|f| f.left), Some(7));
    }
}
