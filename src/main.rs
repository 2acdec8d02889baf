use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use firpipe::audio::{AudioSource, PackedSource};
use firpipe::config::{FilterMode, PipelineConfig};
use firpipe::constants::WAV_HEADER_LEN;
use firpipe::output::{OutputFormat, RunReport, create_formatter};
use firpipe::simulation::{Board, generate_two_tone, run_threaded};
use firpipe::wav::{frames_from_output_words, save_wav};

#[derive(Parser, Debug)]
#[command(name = "firpipe")]
#[command(about = "Run the FIR sample pipeline against a simulated audio board", long_about = None)]
struct Args {
    /// Input audio: 16-bit stereo WAV, or a raw flash image with --raw.
    /// Without an input a 300 Hz + 3 kHz test tone is used.
    input: Option<PathBuf>,

    /// Treat the input as a raw image of packed stereo words
    #[arg(long)]
    raw: bool,

    /// Header bytes to skip in a raw image
    #[arg(long, default_value_t = WAV_HEADER_LEN)]
    header_len: usize,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Filter arithmetic (overrides the config file)
    #[arg(short = 'm', long, value_enum)]
    mode: Option<FilterMode>,

    /// Frames per output buffer (overrides the config file)
    #[arg(long)]
    buffer_size: Option<usize>,

    /// Seconds of audio to run (default: one pass over the input)
    #[arg(short = 's', long)]
    seconds: Option<f32>,

    /// Main loop polls per sample period
    #[arg(long, default_value = "1")]
    polls_per_tick: u32,

    /// Skip the main loop on every Nth sample period to provoke overruns
    #[arg(long)]
    stall_every: Option<u64>,

    /// Run producer and consumer on real threads at the real sample rate
    #[arg(long)]
    threaded: bool,

    /// Play through the default output device in real time
    #[cfg(feature = "cpal-output")]
    #[arg(long, conflicts_with = "threaded")]
    live: bool,

    /// Write what the DAC played to this WAV file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(mode) = args.mode {
        config.filter.mode = mode;
    }
    if let Some(size) = args.buffer_size {
        config.audio.buffer_size = size;
    }
    config.validate()?;

    let (source, input_name) = load_source(&args, &config)?;
    if let Some(rate) = source.sample_rate()
        && rate != config.audio.sample_rate
    {
        log::warn!(
            "Input is {} Hz, pipeline runs at {} Hz; playback speed will differ",
            rate,
            config.audio.sample_rate
        );
    }

    let ticks = match args.seconds {
        Some(secs) => (secs * config.audio.sample_rate as f32) as u64,
        None => source.len() as u64,
    };

    log::info!(
        "Running {} ticks, filter {:?}, {} frames/buffer",
        ticks,
        config.filter.mode,
        config.audio.buffer_size
    );

    #[cfg(feature = "cpal-output")]
    if args.live {
        return run_live(&args, &config, source, input_name, ticks);
    }

    let (report, played) = if args.threaded {
        let run = run_threaded(&config, source, ticks)?;
        let report = RunReport {
            input: input_name,
            sample_rate: config.audio.sample_rate,
            buffer_size: config.audio.buffer_size,
            ticks,
            underruns: 0,
            stats: run.stats,
        };
        (report, run.played)
    } else {
        let mut board = Board::new(&config, source)?;
        board.start()?;
        for tick in 0..ticks {
            let stalled = args.stall_every.is_some_and(|n| n > 0 && tick % n == n - 1);
            board.step(if stalled { 0 } else { args.polls_per_tick })?;
        }
        let report = RunReport {
            input: input_name,
            sample_rate: config.audio.sample_rate,
            buffer_size: config.audio.buffer_size,
            ticks: board.ticks(),
            underruns: board.dac().underruns(),
            stats: board.stats(),
        };
        (report, board.dac().played().to_vec())
    };

    let formatter = create_formatter(args.format, args.verbose > 0);
    println!("{}", formatter.format(&report));

    if let Some(path) = &args.output {
        let frames = frames_from_output_words(&played);
        save_wav(path, &frames, config.audio.sample_rate)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Wrote {} frames to {}", frames.len(), path.display());
    }

    Ok(())
}

/// Run against the host audio device. Nothing is captured for `--output`.
#[cfg(feature = "cpal-output")]
fn run_live(
    args: &Args,
    config: &PipelineConfig,
    source: PackedSource,
    input_name: String,
    ticks: u64,
) -> Result<()> {
    use firpipe::audio::CpalDevice;
    use firpipe::simulation::run_realtime;

    if args.output.is_some() {
        log::warn!("--output is ignored with --live");
    }

    let (stats, _device) = run_realtime(config, source, CpalDevice::new(), ticks)
        .context("Live playback failed")?;
    let report = RunReport {
        input: input_name,
        sample_rate: config.audio.sample_rate,
        buffer_size: config.audio.buffer_size,
        ticks,
        underruns: 0,
        stats,
    };

    let formatter = create_formatter(args.format, args.verbose > 0);
    println!("{}", formatter.format(&report));
    Ok(())
}

fn load_source(args: &Args, config: &PipelineConfig) -> Result<(PackedSource, String)> {
    match &args.input {
        Some(path) if args.raw => {
            let source = PackedSource::from_raw_file(path, args.header_len)
                .with_context(|| format!("Failed to read raw image {}", path.display()))?;
            Ok((source, path.display().to_string()))
        }
        Some(path) => {
            let source = PackedSource::from_wav(path)
                .with_context(|| format!("Failed to read WAV {}", path.display()))?;
            Ok((source, path.display().to_string()))
        }
        None => {
            let frames = generate_two_tone(2.0, config.audio.sample_rate, 300.0, 3000.0, 0.4);
            Ok((PackedSource::from_frames(&frames), "two-tone".to_string()))
        }
    }
}
