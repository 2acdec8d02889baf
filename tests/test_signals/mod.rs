#![allow(dead_code)]

pub mod generate;

pub use generate::{impulse, ramp, sine_q15};
