mod json;
mod text;

use serde::Serialize;

use crate::pipeline::PipelineStats;

pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub input: String,
    pub sample_rate: u32,
    pub buffer_size: usize,
    pub ticks: u64,
    pub underruns: u64,
    #[serde(flatten)]
    pub stats: PipelineStats,
}

impl RunReport {
    /// Seconds of audio the producer ticked through
    pub fn duration_secs(&self) -> f64 {
        self.ticks as f64 / self.sample_rate as f64
    }
}

pub trait Formatter {
    fn format(&self, report: &RunReport) -> String;
}

pub fn create_formatter(format: OutputFormat, verbose: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(verbose)),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
