use std::f32::consts::PI;

use crate::audio::StereoFrame;
use crate::signal_processing::q15;

/// Stereo sine test tone; both channels carry the same signal.
///
/// # Arguments
/// * `frequency_hz` - Tone frequency
/// * `amplitude` - Peak amplitude as a fraction of full scale (0-1)
pub fn generate_tone(
    duration_secs: f32,
    sample_rate: u32,
    frequency_hz: f32,
    amplitude: f32,
) -> Vec<StereoFrame> {
    let num_samples = (duration_secs * sample_rate as f32) as usize;

    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let s = q15::from_f32(amplitude * (2.0 * PI * frequency_hz * t).sin());
            StereoFrame::new(s, s)
        })
        .collect()
}

/// Two-tone test signal: a low tone the reference low-pass keeps and a high
/// tone it removes.
pub fn generate_two_tone(
    duration_secs: f32,
    sample_rate: u32,
    low_hz: f32,
    high_hz: f32,
    amplitude: f32,
) -> Vec<StereoFrame> {
    let low = generate_tone(duration_secs, sample_rate, low_hz, amplitude / 2.0);
    let high = generate_tone(duration_secs, sample_rate, high_hz, amplitude / 2.0);

    low.iter()
        .zip(high.iter())
        .map(|(a, b)| {
            let s = a.left.saturating_add(b.left);
            StereoFrame::new(s, s)
        })
        .collect()
}
