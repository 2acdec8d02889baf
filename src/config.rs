//! Configuration for the sample pipeline.
//!
//! Defaults match the reference board: 8 kHz sampling, 100-frame output
//! buffers and the fixed-point 31-tap low-pass. Any subset of fields can be
//! overridden from a TOML file:
//!
//! ```toml
//! [audio]
//! sample_rate = 16000
//!
//! [filter]
//! mode = "float"
//!
//! [effect]
//! type = "echo"
//! delay_samples = 2000
//! gain = 0.4
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::constants::{DEFAULT_BUFFER_SIZE, DEFAULT_SAMPLE_RATE, DEFAULT_VOLUME};
use crate::error::{PipelineError, Result};

/// Arithmetic used by the channel filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// f32 taps and accumulation
    Float,
    /// Q15 taps, wide accumulator, truncating rescale
    #[default]
    Fixed,
    /// No filtering
    Bypass,
}

/// Per-sample effect stage after the filter
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EffectConfig {
    #[default]
    Passthrough,
    Echo {
        /// Echo delay in samples
        delay_samples: usize,
        /// Echo gain, in [-1.0, 1.0)
        gain: f32,
    },
}

/// Complete pipeline configuration
///
/// # Example
/// ```
/// use firpipe::config::{FilterMode, PipelineConfig};
///
/// let config = PipelineConfig::from_toml_str("[filter]\nmode = \"float\"").unwrap();
/// assert_eq!(config.filter.mode, FilterMode::Float);
/// assert_eq!(config.audio.sample_rate, 8000);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub audio: AudioConfig,
    pub filter: FilterConfig,
    pub effect: EffectConfig,
}

/// Sample clock and output device settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Tick rate of the sample producer in Hz
    pub sample_rate: u32,
    /// Frames per output buffer
    pub buffer_size: usize,
    /// Playback volume handed to the device at init (0-100)
    pub volume: u8,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub mode: FilterMode,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            volume: DEFAULT_VOLUME,
        }
    }
}

impl AudioConfig {
    /// Time between two producer ticks
    pub fn tick_period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.sample_rate as u64)
    }

    /// Time the device needs to play one output buffer
    pub fn buffer_duration(&self) -> Duration {
        self.tick_period() * self.buffer_size as u32
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| PipelineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(PipelineError::Config("sample_rate must be positive".into()));
        }
        if self.audio.buffer_size == 0 {
            return Err(PipelineError::InvalidBufferSize(self.audio.buffer_size));
        }
        if self.audio.volume > 100 {
            return Err(PipelineError::Config(format!(
                "volume {} out of range 0-100",
                self.audio.volume
            )));
        }
        if let EffectConfig::Echo {
            delay_samples,
            gain,
        } = self.effect
        {
            if delay_samples == 0 {
                return Err(PipelineError::Config(
                    "echo delay_samples must be positive".into(),
                ));
            }
            if !(-1.0..1.0).contains(&gain) {
                return Err(PipelineError::Config(format!(
                    "echo gain {} out of range [-1, 1)",
                    gain
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_board() {
        let config = PipelineConfig::default();
        assert_eq!(config.audio.sample_rate, 8000);
        assert_eq!(config.audio.buffer_size, 100);
        assert_eq!(config.audio.volume, 60);
        assert_eq!(config.filter.mode, FilterMode::Fixed);
        assert_eq!(config.effect, EffectConfig::Passthrough);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config.audio.buffer_size, 100);
    }

    #[test]
    fn test_echo_from_toml() {
        let config = PipelineConfig::from_toml_str(
            "[effect]\ntype = \"echo\"\ndelay_samples = 400\ngain = 0.5\n",
        )
        .unwrap();
        assert_eq!(
            config.effect,
            EffectConfig::Echo {
                delay_samples: 400,
                gain: 0.5
            }
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            PipelineConfig::from_toml_str("[audio]\nbuffer_size = 0"),
            Err(PipelineError::InvalidBufferSize(0))
        ));
        assert!(PipelineConfig::from_toml_str("[audio]\nsample_rate = 0").is_err());
        assert!(PipelineConfig::from_toml_str("[audio]\nvolume = 101").is_err());
        assert!(PipelineConfig::from_toml_str("[filter]\nmode = \"double\"").is_err());
        assert!(
            PipelineConfig::from_toml_str(
                "[effect]\ntype = \"echo\"\ndelay_samples = 10\ngain = 1.5"
            )
            .is_err()
        );
    }

    #[test]
    fn test_tick_period() {
        let audio = AudioConfig::default();
        assert_eq!(audio.tick_period(), Duration::from_micros(125));
        assert_eq!(audio.buffer_duration(), Duration::from_micros(12_500));
    }
}
