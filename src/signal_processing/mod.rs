pub mod effect;
pub mod filter;
pub mod fir_core;
pub mod q15;

pub use effect::{Echo, Effect, Passthrough, build_effect};
pub use filter::{Bypass, FloatSampleFilter, SampleFilter, build_filter};
pub use fir_core::{FixedFir, FloatFir, History};
