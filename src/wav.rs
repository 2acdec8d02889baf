use std::path::Path;

use hound::{WavSpec, WavWriter};

use crate::audio::StereoFrame;

/// Write stereo frames as a 16-bit PCM WAV file.
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    frames: &[StereoFrame],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;

    for frame in frames {
        writer.write_sample(frame.left)?;
        writer.write_sample(frame.right)?;
    }

    writer.finalize()?;
    Ok(())
}

/// Decode packed output words (as handed to the playback device).
pub fn frames_from_output_words(words: &[u32]) -> Vec<StereoFrame> {
    words
        .iter()
        .map(|&w| StereoFrame::from_output_word(w))
        .collect()
}
