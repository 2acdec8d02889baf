use std::sync::atomic::{AtomicBool, Ordering};

use crate::audio::AudioSource;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineStats, PlaybackDevice, SampleProducer, TickOutcome};

use super::{SimulatedDac, ThreadedDac};

/// Deterministic host model of the board.
///
/// One [`Board::step`] is one sample period: the timer tick publishes a
/// frame, the main loop polls a given number of times, then the DAC plays
/// one frame. Zero polls models a stalled main loop.
pub struct Board<S: AudioSource> {
    producer: SampleProducer<S>,
    pipeline: Pipeline<SimulatedDac>,
    ticks: u64,
}

impl<S: AudioSource> Board<S> {
    pub fn new(config: &PipelineConfig, source: S) -> Result<Self> {
        let pipeline = Pipeline::new(config, SimulatedDac::new())?;
        let producer = SampleProducer::new(source, pipeline.handoff());
        Ok(Self {
            producer,
            pipeline,
            ticks: 0,
        })
    }

    pub fn start(&mut self) -> Result<()> {
        self.pipeline.start()
    }

    pub fn step(&mut self, polls: u32) -> Result<TickOutcome> {
        let outcome = self.producer.tick();
        for _ in 0..polls {
            self.pipeline.poll()?;
        }
        self.pipeline.device_mut().tick();
        self.ticks += 1;
        Ok(outcome)
    }

    pub fn run(&mut self, ticks: u64, polls_per_tick: u32) -> Result<()> {
        for _ in 0..ticks {
            self.step(polls_per_tick)?;
        }
        Ok(())
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pipeline(&self) -> &Pipeline<SimulatedDac> {
        &self.pipeline
    }

    pub fn producer(&self) -> &SampleProducer<S> {
        &self.producer
    }

    pub fn dac(&self) -> &SimulatedDac {
        self.pipeline.device()
    }

    pub fn stats(&self) -> PipelineStats {
        self.pipeline.stats()
    }
}

/// Result of [`run_threaded`]
pub struct ThreadedRun {
    pub stats: PipelineStats,
    /// Output words in the order the playback worker played them
    pub played: Vec<u32>,
}

/// Run producer and consumer on separate threads in real time.
///
/// The producer thread is paced by a crossbeam tick channel at the configured
/// sample rate; the calling thread busy-polls the pipeline until the
/// producer has issued `ticks` ticks. Returns the final stats and the device.
/// A poll error stops the producer early and is returned.
pub fn run_realtime<S: AudioSource, D: PlaybackDevice>(
    config: &PipelineConfig,
    source: S,
    device: D,
    ticks: u64,
) -> Result<(PipelineStats, D)> {
    let mut pipeline = Pipeline::new(config, device)?;
    pipeline.start()?;

    let mut producer = SampleProducer::new(source, pipeline.handoff());
    let period = config.audio.tick_period();
    let done = AtomicBool::new(false);
    let abort = AtomicBool::new(false);

    std::thread::scope(|s| -> Result<()> {
        s.spawn(|| {
            let ticker = crossbeam_channel::tick(period);
            for _ in 0..ticks {
                if abort.load(Ordering::Acquire) || ticker.recv().is_err() {
                    break;
                }
                producer.tick();
            }
            done.store(true, Ordering::Release);
        });

        let polled = poll_until(&mut pipeline, &done);
        if let Err(e) = &polled {
            log::error!("Consumer stopped: {}", e);
            abort.store(true, Ordering::Release);
        }
        polled
    })?;

    let stats = pipeline.stats();
    log::info!(
        "Real-time run: {} frames processed, {} sample overruns, {} swap overruns",
        stats.frames_processed,
        stats.sample_overruns,
        stats.swap_overruns
    );
    Ok((stats, pipeline.into_device()))
}

/// Busy-poll until the producer is done, then drain its last frame.
fn poll_until<D: PlaybackDevice>(pipeline: &mut Pipeline<D>, done: &AtomicBool) -> Result<()> {
    while !done.load(Ordering::Acquire) {
        pipeline.poll()?;
        std::hint::spin_loop();
    }
    pipeline.poll()?;
    Ok(())
}

/// [`run_realtime`] against a [`ThreadedDac`], collecting what it played.
pub fn run_threaded<S: AudioSource>(
    config: &PipelineConfig,
    source: S,
    ticks: u64,
) -> Result<ThreadedRun> {
    let dac = ThreadedDac::new(config.audio.buffer_duration());
    let (stats, mut dac) = run_realtime(config, source, dac, ticks)?;
    Ok(ThreadedRun {
        stats,
        played: dac.finish(),
    })
}
