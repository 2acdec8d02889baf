pub mod audio;
pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod signal_processing;
pub mod simulation;
pub mod wav;

pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::{Pipeline, SampleProducer};
pub use wav::save_wav;
