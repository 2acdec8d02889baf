mod board;
mod dac;
mod signal;

pub use board::{Board, ThreadedRun, run_realtime, run_threaded};
pub use dac::{SimulatedDac, ThreadedDac};
pub use signal::{generate_tone, generate_two_tone};
