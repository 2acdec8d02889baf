mod test_signals;

use std::time::{Duration, Instant};

use firpipe::audio::{PackedSource, StereoFrame};
use firpipe::config::{AudioConfig, FilterMode, PipelineConfig};
use firpipe::pipeline::{
    BufferId, DeviceCall, Pipeline, PipelineState, RecordingDevice, SlotState,
};
use firpipe::processing::SampleProcessor;
use firpipe::signal_processing::{FloatSampleFilter, Passthrough};
use firpipe::simulation::{Board, run_realtime, run_threaded};
use firpipe::PipelineError;

fn audio(buffer_size: usize) -> AudioConfig {
    AudioConfig {
        buffer_size,
        ..AudioConfig::default()
    }
}

fn bypass_config(buffer_size: usize) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.audio.buffer_size = buffer_size;
    config.filter.mode = FilterMode::Bypass;
    config
}

fn unity_pipeline(buffer_size: usize) -> Pipeline<RecordingDevice> {
    let processor = SampleProcessor::new(
        Box::new(FloatSampleFilter::new([1.0])),
        Box::new(Passthrough),
    );
    let mut pipeline =
        Pipeline::with_processor(&audio(buffer_size), processor, RecordingDevice::new()).unwrap();
    pipeline.start().unwrap();
    pipeline
}

fn left_of(words: &[u32]) -> Vec<i16> {
    words
        .iter()
        .map(|&w| StereoFrame::from_output_word(w).left)
        .collect()
}

#[test]
fn test_end_to_end_unity_filter() {
    let mut pipeline = unity_pipeline(4);
    let handoff = pipeline.handoff();

    for k in 1..=8i16 {
        handoff.sample.publish(StereoFrame::new(10 * k, 0));
        pipeline.poll().unwrap();
    }

    let played = match &pipeline.device().calls()[1] {
        DeviceCall::Play(buffer) => buffer.clone(),
        other => panic!("expected play, got {:?}", other),
    };
    assert_eq!(left_of(&played), vec![10, 20, 30, 40]);
    assert_eq!(pipeline.output().state(BufferId::A), SlotState::Filling);
    assert_eq!(pipeline.output().state(BufferId::B), SlotState::Ready);
    assert_eq!(
        left_of(pipeline.output().buffer(BufferId::B)),
        vec![50, 60, 70, 80]
    );
    assert_eq!(pipeline.stats().sample_overruns, 0);
}

#[test]
fn test_no_playback_before_both_buffers_full() {
    let mut pipeline = unity_pipeline(4);
    let handoff = pipeline.handoff();

    for k in 0..7 {
        handoff.sample.publish(StereoFrame::new(k, k));
        pipeline.poll().unwrap();
        // An early ack must not trigger anything either
        pipeline.device().complete();
        pipeline.poll().unwrap();
    }

    assert_eq!(pipeline.device().play_count(), 0);
    assert!(pipeline.device().buffers().is_empty());
    assert!(!pipeline.stats().playback_started);
}

#[test]
fn test_sample_overrun_keeps_newest() {
    let mut pipeline = unity_pipeline(4);
    let handoff = pipeline.handoff();

    handoff.sample.publish(StereoFrame::new(1, 2));
    handoff.sample.publish(StereoFrame::new(3, 4));
    let outcome = pipeline.poll().unwrap();

    assert_eq!(outcome.processed, Some(StereoFrame::new(3, 4)));
    assert_eq!(pipeline.stats().sample_overruns, 1);
    assert_eq!(pipeline.stats().frames_processed, 1);
    assert_eq!(pipeline.poll().unwrap().processed, None);
}

#[test]
fn test_init_failure_is_terminal() {
    let config = bypass_config(4);
    let mut pipeline = Pipeline::new(&config, RecordingDevice::failing()).unwrap();

    assert!(matches!(pipeline.start(), Err(PipelineError::PlaybackInit(_))));
    assert_eq!(pipeline.state(), PipelineState::Faulted);

    for _ in 0..3 {
        pipeline.handoff().sample.publish(StereoFrame::new(1, 1));
        assert!(matches!(pipeline.poll(), Err(PipelineError::Faulted)));
    }
    assert_eq!(pipeline.device().play_count(), 0);
}

#[test]
fn test_board_plays_ramp_in_order() {
    let config = bypass_config(4);
    let frames = test_signals::ramp(500);
    let mut board = Board::new(&config, PackedSource::from_frames(&frames)).unwrap();
    board.start().unwrap();
    board.run(400, 1).unwrap();

    let stats = board.stats();
    assert_eq!(stats.sample_overruns, 0);
    assert_eq!(stats.swap_overruns, 0);
    assert_eq!(board.dac().underruns(), 0);

    // Playback starts on the tick the second buffer fills.
    let played = board.dac().played();
    assert_eq!(played.len(), 400 - 7);
    for (i, &word) in played.iter().enumerate() {
        assert_eq!(word, frames[i].to_output_word(), "word {}", i);
    }
}

#[test]
fn test_board_stalls_count_overruns() {
    let config = bypass_config(8);
    let frames = test_signals::ramp(1000);
    let mut board = Board::new(&config, PackedSource::from_frames(&frames)).unwrap();
    board.start().unwrap();

    for tick in 0..601u64 {
        let polls = if tick % 5 == 4 { 0 } else { 1 };
        board.step(polls).unwrap();
    }

    let stats = board.stats();
    assert!(stats.sample_overruns > 0);
    assert_eq!(stats.frames_processed + stats.sample_overruns, 601);

    // Dropped frames leave gaps, never reorderings.
    let lefts: Vec<i16> = left_of(board.dac().played())
        .into_iter()
        .filter(|&l| l != 0)
        .collect();
    assert!(lefts.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_threaded_run_preserves_order() {
    let config = bypass_config(100);
    let frames = test_signals::ramp(1000);
    let run = run_threaded(&config, PackedSource::from_frames(&frames), 800).unwrap();

    assert_eq!(run.stats.state, PipelineState::Running);
    assert!(run.stats.playback_started);
    assert!(!run.played.is_empty());
    assert_eq!(run.played.len() % 100, 0);

    let lefts = left_of(&run.played);
    assert!(
        lefts.windows(2).all(|w| w[0] < w[1]),
        "played frames out of order"
    );
}

#[test]
fn test_realtime_run_stops_early_on_device_error() {
    let config = bypass_config(4);
    let frames = test_signals::ramp(100);
    let mut device = RecordingDevice::new();
    device.set_fail_play(true);

    // Ten seconds of ticks; the first pair of full buffers fails after 1 ms.
    let started = Instant::now();
    let result = run_realtime(&config, PackedSource::from_frames(&frames), device, 80_000);

    assert!(matches!(result, Err(PipelineError::PlaybackDevice(_))));
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "took {:?}",
        started.elapsed()
    );
}
