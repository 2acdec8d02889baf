use crate::audio::StereoFrame;
use crate::config::PipelineConfig;
use crate::signal_processing::{Effect, SampleFilter, build_effect, build_filter};

/// Per-sample processing chain: filter, then effect, on the left channel.
/// The right channel passes through untouched.
pub struct SampleProcessor {
    filter: Box<dyn SampleFilter>,
    effect: Box<dyn Effect>,
}

impl SampleProcessor {
    pub fn new(filter: Box<dyn SampleFilter>, effect: Box<dyn Effect>) -> Self {
        Self { filter, effect }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(build_filter(config.filter.mode), build_effect(&config.effect))
    }

    pub fn process(&mut self, frame: StereoFrame) -> StereoFrame {
        let filtered = self.filter.process(frame.left);
        StereoFrame {
            left: self.effect.apply(filtered),
            right: frame.right,
        }
    }

    pub fn reset(&mut self) {
        self.filter.reset();
        self.effect.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EffectConfig, FilterMode};
    use crate::signal_processing::{Bypass, Echo};

    #[test]
    fn test_right_channel_untouched() {
        let mut config = PipelineConfig::default();
        config.filter.mode = FilterMode::Fixed;
        let mut processor = SampleProcessor::from_config(&config);

        let out = processor.process(StereoFrame::new(1000, -77));
        assert_eq!(out.right, -77);
        assert_eq!(out.left, ((1000i64 * -141) >> 15) as i16);
    }

    #[test]
    fn test_effect_runs_after_filter() {
        let mut processor = SampleProcessor::new(Box::new(Bypass), Box::new(Echo::new(1, 16384)));
        processor.process(StereoFrame::new(100, 0));
        assert_eq!(processor.process(StereoFrame::new(0, 0)).left, 50);

        processor.reset();
        assert_eq!(processor.process(StereoFrame::new(0, 0)).left, 0);
    }

    #[test]
    fn test_from_config_with_echo() {
        let mut config = PipelineConfig::default();
        config.filter.mode = FilterMode::Bypass;
        config.effect = EffectConfig::Echo {
            delay_samples: 2,
            gain: 0.5,
        };
        let mut processor = SampleProcessor::from_config(&config);
        let out: Vec<i16> = [200, 0, 0]
            .iter()
            .map(|&x| processor.process(StereoFrame::new(x, 0)).left)
            .collect();
        assert_eq!(out, vec![200, 0, 100]);
    }
}
