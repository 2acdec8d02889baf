pub mod frame;
#[cfg(feature = "cpal-output")]
pub mod playback;
pub mod source;

pub use frame::StereoFrame;
#[cfg(feature = "cpal-output")]
pub use playback::CpalDevice;
pub use source::{AudioSource, PackedSource};
