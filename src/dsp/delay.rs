//! Fixed delay line for the rear channels.

/// Rear delay time in milliseconds.
pub const REAR_DELAY_MS: f64 = 10.0;

/// Highest rate the full 10 ms delay is guaranteed for.
pub const MAX_SUPPORTED_SAMPLE_RATE: u32 = 192_000;

/// Buffer capacity: 10 ms at [`MAX_SUPPORTED_SAMPLE_RATE`].
pub const MAX_DELAY_SAMPLES: usize = MAX_SUPPORTED_SAMPLE_RATE as usize / 100;

/// Delay length for `sample_rate`, clamped to `1..=MAX_DELAY_SAMPLES`.
pub fn delay_samples_for(sample_rate: u32) -> usize {
    let samples = (sample_rate as f64 / 1000.0 * REAR_DELAY_MS).round() as usize;
    samples.clamp(1, MAX_DELAY_SAMPLES)
}

/// A single-cursor circular delay.
///
/// The buffer is allocated once at [`MAX_DELAY_SAMPLES`]; changing the delay
/// length only moves the wrap point.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    cursor: usize,
    length: usize,
}

impl DelayLine {
    pub fn new(length: usize) -> Self {
        Self {
            buffer: vec![0.0; MAX_DELAY_SAMPLES],
            cursor: 0,
            length: length.clamp(1, MAX_DELAY_SAMPLES),
        }
    }

    /// Return the sample pushed `length` calls ago and store `sample` in
    /// its slot.
    #[inline]
    pub fn push(&mut self, sample: f32) -> f32 {
        let delayed = self.buffer[self.cursor];
        self.buffer[self.cursor] = sample;
        self.cursor += 1;
        if self.cursor >= self.length {
            self.cursor = 0;
        }
        delayed
    }

    /// Change the delay length and clear the buffer.
    pub fn set_length(&mut self, length: usize) {
        self.length = length.clamp(1, MAX_DELAY_SAMPLES);
        self.clear();
    }

    /// Delay in samples, always at least one.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Zero the buffer and rewind the cursor.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.cursor = 0;
    }
}
