//! Error types for decoder construction, configuration, and output routing.

use thiserror::Error;

/// Crate-wide error type.
///
/// The per-sample decode path never fails; these only surface from
/// construction, sample-rate changes, config loading, and buffer routing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecoderError {
    /// Sample rate must be a positive number of Hz.
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    /// Output config could not be parsed.
    #[error("Config error: {0}")]
    Config(String),

    /// Caller-supplied buffer cannot hold the requested frames.
    #[error("Buffer too small: need {needed} samples, got {got}")]
    BufferTooSmall { needed: usize, got: usize },

    /// WAV encoding failed.
    #[error("WAV error: {0}")]
    Wav(String),

    /// Interleaved input length is not a whole number of stereo frames.
    #[error("Input length {0} is not a whole number of stereo frames")]
    PartialFrame(usize),
}

impl From<serde_json::Error> for DecoderError {
    fn from(e: serde_json::Error) -> Self {
        DecoderError::Config(e.to_string())
    }
}

impl From<hound::Error> for DecoderError {
    fn from(e: hound::Error) -> Self {
        DecoderError::Wav(e.to_string())
    }
}

/// Reject rates the filters and delay lines cannot be derived for.
pub(crate) fn check_sample_rate(sample_rate: u32) -> Result<u32, DecoderError> {
    if sample_rate == 0 {
        return Err(DecoderError::InvalidSampleRate(sample_rate));
    }
    Ok(sample_rate)
}
