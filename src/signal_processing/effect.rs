use crate::config::EffectConfig;
use crate::signal_processing::q15;

/// Pluggable single-sample transform applied after the filter.
pub trait Effect: Send {
    fn apply(&mut self, sample: i16) -> i16;

    fn reset(&mut self) {}
}

/// Leaves the sample untouched.
pub struct Passthrough;

impl Effect for Passthrough {
    fn apply(&mut self, sample: i16) -> i16 {
        sample
    }
}

/// Feedforward echo: `y[n] = x[n] + gain * x[n - delay]`, saturating.
pub struct Echo {
    delay_line: Vec<i16>,
    pos: usize,
    gain: i16,
}

impl Echo {
    /// # Arguments
    /// * `delay_samples` - Echo delay, at least 1
    /// * `gain` - Echo gain in Q15
    pub fn new(delay_samples: usize, gain: i16) -> Self {
        Self {
            delay_line: vec![0; delay_samples.max(1)],
            pos: 0,
            gain,
        }
    }
}

impl Effect for Echo {
    fn apply(&mut self, sample: i16) -> i16 {
        let delayed = self.delay_line[self.pos];
        self.delay_line[self.pos] = sample;
        self.pos += 1;
        if self.pos == self.delay_line.len() {
            self.pos = 0;
        }
        q15::add_sat(sample, q15::mul(delayed, self.gain))
    }

    fn reset(&mut self) {
        self.delay_line.fill(0);
        self.pos = 0;
    }
}

pub fn build_effect(config: &EffectConfig) -> Box<dyn Effect> {
    match *config {
        EffectConfig::Passthrough => Box::new(Passthrough),
        EffectConfig::Echo {
            delay_samples,
            gain,
        } => Box::new(Echo::new(delay_samples, q15::from_f32(gain))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough() {
        let mut effect = build_effect(&EffectConfig::Passthrough);
        assert_eq!(effect.apply(-1234), -1234);
    }

    #[test]
    fn test_echo_repeats_after_delay() {
        let mut echo = Echo::new(3, 16384); // gain 0.5
        let out: Vec<i16> = [1000, 0, 0, 0, 0, 0].iter().map(|&x| echo.apply(x)).collect();
        assert_eq!(out, vec![1000, 0, 0, 500, 0, 0]);
    }

    #[test]
    fn test_echo_saturates() {
        let mut echo = Echo::new(1, i16::MAX);
        echo.apply(30000);
        assert_eq!(echo.apply(30000), i16::MAX);
    }

    #[test]
    fn test_echo_reset() {
        let mut echo = Echo::new(2, 16384);
        echo.apply(1000);
        echo.reset();
        echo.apply(0);
        assert_eq!(echo.apply(0), 0);
    }
}
