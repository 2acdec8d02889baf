use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Playback device failed to initialize: {0}")]
    PlaybackInit(String),

    #[error("Playback device error: {0}")]
    PlaybackDevice(String),

    #[error("Pipeline is in the fault state")]
    Faulted,

    #[error("Pipeline has not been started")]
    NotStarted,

    #[error("Audio source error: {0}")]
    AudioSource(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid output buffer size: {0} frames")]
    InvalidBufferSize(usize),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
