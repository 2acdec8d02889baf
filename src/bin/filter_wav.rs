use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use hound::{WavReader, WavWriter};
use serde::Serialize;

use firpipe::config::FilterMode;
use firpipe::constants::{FIXED_TAPS, FLOAT_TAPS};
use firpipe::signal_processing::{FixedFir, FloatFir, SampleFilter, build_filter, q15};

#[derive(Parser, Debug)]
#[command(name = "filter_wav")]
#[command(about = "Run the reference FIR filter over a 16-bit WAV file", long_about = None)]
struct Args {
    /// Input WAV (16-bit integer PCM, any channel count)
    input: PathBuf,

    /// Output WAV
    output: PathBuf,

    /// Filter arithmetic
    #[arg(short = 'm', long, value_enum, default_value = "fixed")]
    mode: FilterMode,

    /// Also run float and fixed side by side and report how far they differ
    #[arg(long)]
    compare: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Serialize)]
struct ParityReport {
    samples: usize,
    max_abs_diff_lsb: f32,
    rms_diff_lsb: f32,
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

    let reader = WavReader::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let spec = reader.spec();
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        bail!(
            "Expected 16-bit integer PCM, got {} bit {:?}",
            spec.bits_per_sample,
            spec.sample_format
        );
    }

    let channels = spec.channels as usize;
    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to decode samples")?;

    log::info!(
        "{}: {} frames, {} channel(s), {} Hz, filter {:?}",
        args.input.display(),
        samples.len() / channels,
        channels,
        spec.sample_rate,
        args.mode
    );

    // One filter instance per channel, each with its own history.
    let mut filters: Vec<Box<dyn SampleFilter>> =
        (0..channels).map(|_| build_filter(args.mode)).collect();

    let mut writer = WavWriter::create(&args.output, spec)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    for frame in samples.chunks_exact(channels) {
        for (sample, filter) in frame.iter().zip(filters.iter_mut()) {
            writer.write_sample(filter.process(*sample))?;
        }
    }
    writer.finalize()?;

    if args.compare {
        let first_channel: Vec<i16> = samples.iter().step_by(channels).copied().collect();
        let report = compare(&first_channel);
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

/// Feed the same input through the float and fixed filters and measure the
/// difference in Q15 LSBs.
fn compare(input: &[i16]) -> ParityReport {
    let mut float = FloatFir::new(FLOAT_TAPS);
    let mut fixed = FixedFir::new(FIXED_TAPS);
    log::debug!(
        "Comparing {} samples, group delay {} samples",
        input.len(),
        float.group_delay_samples()
    );

    let mut max_abs = 0.0f32;
    let mut sum_sq = 0.0f64;
    for &x in input {
        let f = float.push_and_convolve(q15::to_f32(x)) * 32768.0;
        let q = fixed.push_and_convolve(x) as f32;
        let diff = f - q;
        max_abs = max_abs.max(diff.abs());
        sum_sq += (diff as f64) * (diff as f64);
    }

    let rms = if input.is_empty() {
        0.0
    } else {
        (sum_sq / input.len() as f64).sqrt() as f32
    };

    ParityReport {
        samples: input.len(),
        max_abs_diff_lsb: max_abs,
        rms_diff_lsb: rms,
    }
}
