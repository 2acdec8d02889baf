use crate::config::FilterMode;
use crate::constants::{FIXED_TAPS, FLOAT_TAPS, NUM_TAPS};
use crate::signal_processing::q15;
use crate::signal_processing::{FixedFir, FloatFir};

/// Per-sample filter stage of the pipeline, operating on raw 16-bit samples.
pub trait SampleFilter: Send {
    /// Filter one sample
    fn process(&mut self, sample: i16) -> i16;

    /// Forget all past input
    fn reset(&mut self);
}

impl<const N: usize> SampleFilter for FixedFir<N> {
    fn process(&mut self, sample: i16) -> i16 {
        self.push_and_convolve(sample)
    }

    fn reset(&mut self) {
        FixedFir::reset(self);
    }
}

/// Runs a float FIR on 16-bit samples.
///
/// Input is read as Q15, filtered in f32, then rounded and saturated back.
pub struct FloatSampleFilter<const N: usize> {
    fir: FloatFir<N>,
}

impl<const N: usize> FloatSampleFilter<N> {
    pub fn new(taps: [f32; N]) -> Self {
        Self {
            fir: FloatFir::new(taps),
        }
    }
}

impl<const N: usize> SampleFilter for FloatSampleFilter<N> {
    fn process(&mut self, sample: i16) -> i16 {
        q15::from_f32(self.fir.push_and_convolve(q15::to_f32(sample)))
    }

    fn reset(&mut self) {
        self.fir.reset();
    }
}

/// Identity filter.
pub struct Bypass;

impl SampleFilter for Bypass {
    fn process(&mut self, sample: i16) -> i16 {
        sample
    }

    fn reset(&mut self) {}
}

/// Build the reference 31-tap low-pass in the requested arithmetic.
pub fn build_filter(mode: FilterMode) -> Box<dyn SampleFilter> {
    match mode {
        FilterMode::Float => Box::new(FloatSampleFilter::<NUM_TAPS>::new(FLOAT_TAPS)),
        FilterMode::Fixed => Box::new(FixedFir::<NUM_TAPS>::new(FIXED_TAPS)),
        FilterMode::Bypass => Box::new(Bypass),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bypass_is_identity() {
        let mut filter = build_filter(FilterMode::Bypass);
        for x in [i16::MIN, -1, 0, 1, i16::MAX] {
            assert_eq!(filter.process(x), x);
        }
    }

    #[test]
    fn test_float_and_fixed_agree_on_dc() {
        let mut float = build_filter(FilterMode::Float);
        let mut fixed = build_filter(FilterMode::Fixed);

        // DC gain of the reference taps is about 2.19, keep the input small.
        let mut out = (0, 0);
        for _ in 0..NUM_TAPS {
            out = (float.process(4000), fixed.process(4000));
        }
        assert!((out.0 as i32 - out.1 as i32).abs() <= 8, "{:?}", out);
        assert!((out.0 as i32 - 8770).abs() < 20, "{:?}", out);
    }

    #[test]
    fn test_float_output_saturates() {
        let mut float = build_filter(FilterMode::Float);
        let mut out = 0;
        for _ in 0..NUM_TAPS {
            out = float.process(i16::MAX);
        }
        assert_eq!(out, i16::MAX);
    }

    #[test]
    fn test_reset_through_trait() {
        let mut fixed = build_filter(FilterMode::Fixed);
        let first = fixed.process(1000);
        fixed.process(1000);
        fixed.reset();
        assert_eq!(fixed.process(1000), first);
    }
}
