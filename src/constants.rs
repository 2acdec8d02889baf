//! Design-time constants for the reference board and filter.
//!
//! The tap tables are the output of an offline low-pass design; this crate
//! only consumes them.

/// Output sample rate of the reference board in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 8000;

/// Frames per output buffer (one frame = one packed 32-bit stereo word).
pub const DEFAULT_BUFFER_SIZE: usize = 100;

/// Output volume passed to the playback device at init (0-100).
pub const DEFAULT_VOLUME: u8 = 60;

/// Number of taps in the reference low-pass filter.
pub const NUM_TAPS: usize = 31;

/// Length of the RIFF/WAV header preceding raw audio in a flashed image.
pub const WAV_HEADER_LEN: usize = 44;

/// Q15 scale factor (2^15).
pub const Q15_SCALE: f32 = 32768.0;

/// Right shift that rescales a Q15 x Q15 product back to Q15.
pub const Q15_SHIFT: u32 = 15;

/// Reference low-pass taps, floating point. Symmetric, so linear phase.
pub const FLOAT_TAPS: [f32; NUM_TAPS] = [
    -0.004_289_844_3,
    -0.000_141_564_32,
    -0.003_620_168_6,
    0.004_827_258,
    0.003_615_553_1,
    0.020_675_518,
    0.024_022_855,
    0.051_424_413,
    0.059_394_306,
    0.095_276_38,
    0.104_432_08,
    0.142_945_41,
    0.147_078_69,
    0.180_283_98,
    0.173_166_24,
    0.194_454_15,
    0.173_166_24,
    0.180_283_98,
    0.147_078_69,
    0.142_945_41,
    0.104_432_08,
    0.095_276_38,
    0.059_394_306,
    0.051_424_413,
    0.024_022_855,
    0.020_675_518,
    0.003_615_553_1,
    0.004_827_258,
    -0.003_620_168_6,
    -0.000_141_564_32,
    -0.004_289_844_3,
];

/// Reference low-pass taps quantised to Q15 (`FLOAT_TAPS` x 32768, rounded).
pub const FIXED_TAPS: [i16; NUM_TAPS] = [
    -141, -5, -119, 158, 118, 677, 787, 1685, 1946, 3122, 3422, 4684, 4819, 5908, 5674, 6372,
    5674, 5908, 4819, 4684, 3422, 3122, 1946, 1685, 787, 677, 118, 158, -119, -5, -141,
];
