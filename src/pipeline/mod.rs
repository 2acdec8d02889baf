pub mod device;
pub mod driver;
pub mod handoff;
pub mod output;
pub mod producer;

pub use device::{DeviceCall, PlaybackDevice, RecordingDevice};
pub use driver::{Pipeline, PipelineState, PipelineStats, PollOutcome};
pub use handoff::{CompletionHandle, Handoff, PlaybackAck, SampleSlot};
pub use output::{BufferId, OutputStage, SlotState};
pub use producer::{SampleProducer, TickOutcome};
