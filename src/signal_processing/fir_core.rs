use crate::constants::Q15_SHIFT;

/// Fixed-length delay line holding the N most recent samples.
///
/// Logically the newest sample sits at index 0 and the oldest at N-1. The
/// storage is a ring: `head` points at the newest entry and moves backwards
/// on every push, so inserting a sample overwrites the oldest one without
/// shifting the rest.
#[derive(Debug, Clone)]
pub struct History<T, const N: usize> {
    samples: [T; N],
    head: usize,
}

impl<T: Copy + Default, const N: usize> History<T, N> {
    pub fn new() -> Self {
        const { assert!(N > 0, "a delay line needs at least one slot") };
        Self {
            samples: [T::default(); N],
            head: 0,
        }
    }

    /// Zero every slot.
    pub fn reset(&mut self) {
        self.samples = [T::default(); N];
        self.head = 0;
    }

    /// Insert `sample` as the newest entry, discarding the oldest.
    pub fn push(&mut self, sample: T) {
        self.head = if self.head == 0 { N - 1 } else { self.head - 1 };
        self.samples[self.head] = sample;
    }

    /// Iterate newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        // Two contiguous ranges instead of a modulo per element.
        self.samples[self.head..]
            .iter()
            .chain(self.samples[..self.head].iter())
    }

    /// Copy of the delay line in logical order (index 0 = newest).
    pub fn snapshot(&self) -> [T; N] {
        std::array::from_fn(|i| self.samples[(self.head + i) % N])
    }
}

impl<T: Copy + Default, const N: usize> Default for History<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Floating-point FIR filter.
///
/// `taps[i]` multiplies the i-th most recent input, so the impulse response
/// of the filter is the tap sequence itself.
#[derive(Debug, Clone)]
pub struct FloatFir<const N: usize> {
    taps: [f32; N],
    history: History<f32, N>,
}

impl<const N: usize> FloatFir<N> {
    /// Create a filter with zeroed history.
    pub fn new(taps: [f32; N]) -> Self {
        Self {
            taps,
            history: History::new(),
        }
    }

    /// Zero the history. Taps are kept.
    pub fn reset(&mut self) {
        self.history.reset();
    }

    /// Push one input sample and return the filter output for it.
    ///
    /// The first N-1 outputs after a reset convolve against a partly zero
    /// history (warm-up). NaN inputs propagate like any other f32 value.
    pub fn push_and_convolve(&mut self, sample: f32) -> f32 {
        self.history.push(sample);

        let mut acc = 0.0f32;
        for (tap, x) in self.taps.iter().zip(self.history.iter()) {
            acc += tap * x;
        }
        acc
    }

    /// Filter an entire buffer of samples in-place
    pub fn process_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.push_and_convolve(*sample);
        }
    }

    pub fn num_taps(&self) -> usize {
        N
    }

    /// Group delay in samples, valid for symmetric (linear phase) taps
    pub fn group_delay_samples(&self) -> usize {
        (N - 1) / 2
    }

    pub fn taps(&self) -> &[f32; N] {
        &self.taps
    }

    /// Current history, newest first.
    pub fn history(&self) -> [f32; N] {
        self.history.snapshot()
    }
}

/// Q15 fixed-point FIR filter.
///
/// Products are accumulated in an `i64` (31 full-scale Q15 x Q15 products
/// already overflow `i32`). The sum is then arithmetically shifted right by
/// 15 and cast to `i16`.
///
/// The rescale is lossy on purpose: the shift truncates toward negative
/// infinity without a rounding offset, so every output sits up to one LSB
/// below the exact result, and a sum outside the Q15 range wraps on the cast.
#[derive(Debug, Clone)]
pub struct FixedFir<const N: usize> {
    taps: [i16; N],
    history: History<i16, N>,
}

impl<const N: usize> FixedFir<N> {
    pub fn new(taps: [i16; N]) -> Self {
        Self {
            taps,
            history: History::new(),
        }
    }

    pub fn reset(&mut self) {
        self.history.reset();
    }

    /// Push one Q15 input sample and return the Q15 filter output for it.
    pub fn push_and_convolve(&mut self, sample: i16) -> i16 {
        self.history.push(sample);

        let acc: i64 = self
            .taps
            .iter()
            .zip(self.history.iter())
            .map(|(&tap, &x)| tap as i64 * x as i64)
            .sum();

        (acc >> Q15_SHIFT) as i16
    }

    pub fn process_buffer(&mut self, buffer: &mut [i16]) {
        for sample in buffer.iter_mut() {
            *sample = self.push_and_convolve(*sample);
        }
    }

    pub fn num_taps(&self) -> usize {
        N
    }

    pub fn taps(&self) -> &[i16; N] {
        &self.taps
    }

    pub fn history(&self) -> [i16; N] {
        self.history.snapshot()
    }
}
