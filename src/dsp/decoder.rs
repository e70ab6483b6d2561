//! Passive-matrix stereo to 5.1 decoder.
//!
//! Front left/right pass through at half gain. Centre and LFE are derived
//! from the mono sum, band-limited. Each rear channel mixes a high-passed,
//! phase-swept copy of both inputs (one of them inverted) and delays the
//! result by 10 ms. There is no steering: the matrix is fixed.

use tracing::debug;

use super::delay::{DelayLine, delay_samples_for};
use super::filter::{FilterCoefficients, FilterState};
use super::phase_shift::PhaseShiftState;
use crate::error::{DecoderError, check_sample_rate};

/// Interleaved output channels per frame.
pub const SURROUND_CHANNELS: usize = 6;
/// Interleaved input channels per frame.
pub const STEREO_CHANNELS: usize = 2;

/// `1 / (2·√2)`: mono-sum gain for centre and LFE.
pub const CENTER_GAIN: f32 = 0.353_553_39;
/// `√19 / 10`: same-side contribution to a rear channel.
pub const REAR_MAIN_GAIN: f32 = 0.435_889_9;
/// `√6 / 10`: opposite-side contribution to a rear channel.
pub const REAR_CROSS_GAIN: f32 = 0.244_948_97;
/// Front channels pass through at this gain.
pub const FRONT_GAIN: f32 = 0.5;

pub const CENTER_HIGH_PASS_HZ: f64 = 70.0;
pub const CENTER_LOW_PASS_HZ: f64 = 20_000.0;
pub const REAR_HIGH_PASS_HZ: f64 = 100.0;
pub const LFE_LOW_PASS_HZ: f64 = 120.0;

/// Slot order within one interleaved 5.1 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurroundChannel {
    FrontLeft = 0,
    FrontRight = 1,
    Center = 2,
    Lfe = 3,
    RearLeft = 4,
    RearRight = 5,
}

impl SurroundChannel {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Coefficient sets shared by every filter instance at one sample rate.
#[derive(Debug, Clone, Default)]
struct Coefficients {
    center_high_pass: FilterCoefficients,
    center_low_pass: FilterCoefficients,
    rear_high_pass: FilterCoefficients,
    lfe_low_pass: FilterCoefficients,
}

impl Coefficients {
    fn for_rate(sample_rate: f64) -> Self {
        Self {
            center_high_pass: FilterCoefficients::high_pass(CENTER_HIGH_PASS_HZ, sample_rate),
            center_low_pass: FilterCoefficients::low_pass(CENTER_LOW_PASS_HZ, sample_rate),
            rear_high_pass: FilterCoefficients::high_pass(REAR_HIGH_PASS_HZ, sample_rate),
            lfe_low_pass: FilterCoefficients::low_pass(LFE_LOW_PASS_HZ, sample_rate),
        }
    }
}

/// One input's contribution to a rear channel.
#[derive(Debug, Clone)]
struct RearComponent {
    gain: f32,
    invert: bool,
    high_pass: FilterState,
    phase: PhaseShiftState,
}

impl RearComponent {
    fn new(gain: f32, invert: bool) -> Self {
        Self {
            gain,
            invert,
            high_pass: FilterState::default(),
            phase: PhaseShiftState::new(),
        }
    }

    #[inline]
    fn process(&mut self, input: f32, high_pass: &FilterCoefficients, sample_rate: f64) -> f32 {
        let filtered = self.high_pass.apply(input * self.gain, high_pass);
        self.phase.apply(filtered, sample_rate, self.invert)
    }

    fn reset(&mut self) {
        self.high_pass.reset();
        self.phase.reset();
    }
}

/// A rear output: inverted left-derived plus right-derived, then delayed.
#[derive(Debug, Clone)]
struct RearChannel {
    from_left: RearComponent,
    from_right: RearComponent,
    delay: DelayLine,
}

impl RearChannel {
    fn new(left_gain: f32, right_gain: f32, delay_samples: usize) -> Self {
        Self {
            from_left: RearComponent::new(left_gain, true),
            from_right: RearComponent::new(right_gain, false),
            delay: DelayLine::new(delay_samples),
        }
    }

    #[inline]
    fn process(&mut self, left: f32, right: f32, high_pass: &FilterCoefficients, sample_rate: f64) -> f32 {
        let l = self.from_left.process(left, high_pass, sample_rate);
        let r = self.from_right.process(right, high_pass, sample_rate);
        self.delay.push(l + r)
    }

    fn reset(&mut self, delay_samples: usize) {
        self.from_left.reset();
        self.from_right.reset();
        self.delay.set_length(delay_samples);
    }
}

/// Stereo to 5.1 upmixer with persistent per-channel state.
///
/// One decoder serves one stream. All buffers are allocated in [`new`];
/// [`process`] never allocates.
///
/// [`new`]: SurroundDecoder::new
/// [`process`]: SurroundDecoder::process
#[derive(Debug, Clone)]
pub struct SurroundDecoder {
    sample_rate: u32,
    delay_samples: usize,
    coeffs: Coefficients,
    center_high_pass: FilterState,
    center_low_pass: FilterState,
    lfe_low_pass: FilterState,
    rear_left: RearChannel,
    rear_right: RearChannel,
    initialized: bool,
}

impl SurroundDecoder {
    /// Create a decoder for `sample_rate` Hz. Derived state is built lazily
    /// on the first [`process`](Self::process) unless [`reset`](Self::reset)
    /// is called first.
    pub fn new(sample_rate: u32) -> Result<Self, DecoderError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        let delay_samples = delay_samples_for(sample_rate);
        Ok(Self {
            sample_rate,
            delay_samples,
            coeffs: Coefficients::default(),
            center_high_pass: FilterState::default(),
            center_low_pass: FilterState::default(),
            lfe_low_pass: FilterState::default(),
            rear_left: RearChannel::new(REAR_MAIN_GAIN, REAR_CROSS_GAIN, delay_samples),
            rear_right: RearChannel::new(REAR_CROSS_GAIN, REAR_MAIN_GAIN, delay_samples),
            initialized: false,
        })
    }

    /// Store a new rate. All derived state is stale until the next
    /// [`reset`](Self::reset), which `process` performs if the caller doesn't.
    pub fn set_sample_rate(&mut self, sample_rate: u32) -> Result<(), DecoderError> {
        self.sample_rate = check_sample_rate(sample_rate)?;
        self.initialized = false;
        Ok(())
    }

    /// Rebuild coefficients and delay length for the current rate and zero
    /// every filter, phase shifter, and delay line.
    pub fn reset(&mut self) {
        let rate = self.sample_rate as f64;
        self.delay_samples = delay_samples_for(self.sample_rate);
        self.coeffs = Coefficients::for_rate(rate);

        self.center_high_pass.reset();
        self.center_low_pass.reset();
        self.lfe_low_pass.reset();
        self.rear_left.reset(self.delay_samples);
        self.rear_right.reset(self.delay_samples);
        self.initialized = true;

        debug!(
            sample_rate = self.sample_rate,
            delay_samples = self.delay_samples,
            "Surround decoder reset"
        );
    }

    /// Decode `num_samples` interleaved stereo frames from `stereo_in` into
    /// interleaved `FL, FR, C, LFE, RL, RR` frames in `surround_out`.
    ///
    /// `stereo_in` must hold at least `2 · num_samples` samples and
    /// `surround_out` at least `6 · num_samples`; anything beyond is left
    /// untouched.
    ///
    /// # Panics
    /// If either buffer is shorter than required.
    pub fn process(&mut self, stereo_in: &[i16], surround_out: &mut [i16], num_samples: usize) {
        debug_assert!(stereo_in.len() >= num_samples * STEREO_CHANNELS);
        debug_assert!(surround_out.len() >= num_samples * SURROUND_CHANNELS);

        if num_samples == 0 {
            return;
        }
        if !self.initialized {
            self.reset();
        }

        let rate = self.sample_rate as f64;
        let input = &stereo_in[..num_samples * STEREO_CHANNELS];
        let output = &mut surround_out[..num_samples * SURROUND_CHANNELS];

        for (frame_in, frame_out) in input
            .chunks_exact(STEREO_CHANNELS)
            .zip(output.chunks_exact_mut(SURROUND_CHANNELS))
        {
            let left = frame_in[0] as f32;
            let right = frame_in[1] as f32;
            let mono = (left + right) * CENTER_GAIN;

            let center = self.center_high_pass.apply(mono, &self.coeffs.center_high_pass);
            let center = self.center_low_pass.apply(center, &self.coeffs.center_low_pass);

            let rear_left = self.rear_left.process(left, right, &self.coeffs.rear_high_pass, rate);
            let rear_right = self.rear_right.process(left, right, &self.coeffs.rear_high_pass, rate);

            let lfe = self.lfe_low_pass.apply(mono, &self.coeffs.lfe_low_pass);

            frame_out[SurroundChannel::FrontLeft.index()] = saturate(left * FRONT_GAIN);
            frame_out[SurroundChannel::FrontRight.index()] = saturate(right * FRONT_GAIN);
            frame_out[SurroundChannel::Center.index()] = saturate(center);
            frame_out[SurroundChannel::Lfe.index()] = saturate(lfe);
            frame_out[SurroundChannel::RearLeft.index()] = saturate(rear_left);
            frame_out[SurroundChannel::RearRight.index()] = saturate(rear_right);
        }
    }

    /// Decode a whole interleaved stereo buffer into a new 5.1 buffer.
    /// A trailing half frame is ignored.
    pub fn decode(&mut self, stereo_in: &[i16]) -> Vec<i16> {
        let frames = stereo_in.len() / STEREO_CHANNELS;
        let mut out = vec![0; frames * SURROUND_CHANNELS];
        self.process(stereo_in, &mut out, frames);
        out
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Rear delay in samples as of the last reset.
    pub fn delay_samples(&self) -> usize {
        self.delay_samples
    }

    /// False after construction or a rate change until the next reset.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// Clamp to the i16 range; the fractional part is truncated.
#[inline]
fn saturate(sample: f32) -> i16 {
    sample.clamp(i16::MIN as f32, i16::MAX as f32) as i16
}
