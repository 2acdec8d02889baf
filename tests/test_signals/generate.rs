use std::f32::consts::PI;

use firpipe::audio::StereoFrame;

/// Frames tagged 0, 1, 2, ... on the left channel and negated on the right.
pub fn ramp(len: usize) -> Vec<StereoFrame> {
    (0..len)
        .map(|i| {
            let v = i as i16;
            StereoFrame::new(v, v.wrapping_neg())
        })
        .collect()
}

/// `amplitude` followed by `len - 1` zeros.
pub fn impulse<T: Copy + Default>(amplitude: T, len: usize) -> Vec<T> {
    let mut samples = vec![T::default(); len];
    if let Some(first) = samples.first_mut() {
        *first = amplitude;
    }
    samples
}

/// Q15 sine, amplitude as a fraction of full scale.
pub fn sine_q15(len: usize, sample_rate: f32, frequency_hz: f32, amplitude: f32) -> Vec<i16> {
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate;
            let x = amplitude * (2.0 * PI * frequency_hz * t).sin();
            (x * 32768.0).round() as i16
        })
        .collect()
}
