//! Output stage — routes stereo either straight through or via the decoder.
//!
//! This is the player-side half of the decoder contract: it owns the
//! decoder, picks passthrough or 5.1 from the configured channel mode, and
//! resets the decoder whenever the device rate changes.

use tracing::{info, warn};

use super::decoder::{STEREO_CHANNELS, SurroundDecoder};
use crate::config::{ChannelMode, OutputConfig};
use crate::error::{DecoderError, check_sample_rate};

#[derive(Debug, Clone)]
pub struct OutputStage {
    config: OutputConfig,
    decoder: Option<SurroundDecoder>,
}

impl OutputStage {
    pub fn new(config: OutputConfig) -> Result<Self, DecoderError> {
        config.validate()?;
        let decoder = Self::decoder_for(&config)?;
        info!(
            channel_mode = ?config.channel_mode,
            sample_rate = config.sample_rate,
            "Output stage configured"
        );
        Ok(Self { config, decoder })
    }

    fn decoder_for(config: &OutputConfig) -> Result<Option<SurroundDecoder>, DecoderError> {
        match config.channel_mode {
            ChannelMode::Stereo => Ok(None),
            ChannelMode::Surround51 => {
                let mut decoder = SurroundDecoder::new(config.sample_rate)?;
                decoder.reset();
                Ok(Some(decoder))
            }
        }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    pub fn output_channels(&self) -> usize {
        self.config.channel_mode.output_channels()
    }

    pub fn decoder(&self) -> Option<&SurroundDecoder> {
        self.decoder.as_ref()
    }

    /// Device rate changed: retune and reset the decoder.
    pub fn set_sample_rate(&mut self, sample_rate: u32) -> Result<(), DecoderError> {
        if let Some(decoder) = self.decoder.as_mut() {
            decoder.set_sample_rate(sample_rate)?;
            decoder.reset();
        } else {
            check_sample_rate(sample_rate)?;
        }
        self.config.sample_rate = sample_rate;
        info!(sample_rate, "Output sample rate changed");
        Ok(())
    }

    /// Switch layout. Entering surround mode starts from a fresh decoder.
    pub fn set_channel_mode(&mut self, mode: ChannelMode) -> Result<(), DecoderError> {
        if mode == self.config.channel_mode {
            return Ok(());
        }
        let config = OutputConfig {
            channel_mode: mode,
            ..self.config.clone()
        };
        self.decoder = Self::decoder_for(&config)?;
        self.config = config;
        info!(channel_mode = ?mode, "Output channel mode changed");
        Ok(())
    }

    /// Route one block of interleaved stereo into `out`, returning the number
    /// of samples written (`frames × output_channels()`).
    pub fn process(&mut self, stereo_in: &[i16], out: &mut [i16]) -> Result<usize, DecoderError> {
        if stereo_in.len() % STEREO_CHANNELS != 0 {
            warn!(len = stereo_in.len(), "Refusing partial stereo frame");
            return Err(DecoderError::PartialFrame(stereo_in.len()));
        }
        let frames = stereo_in.len() / STEREO_CHANNELS;
        let needed = frames * self.output_channels();
        if out.len() < needed {
            warn!(needed, got = out.len(), "Output buffer too small");
            return Err(DecoderError::BufferTooSmall {
                needed,
                got: out.len(),
            });
        }

        match self.decoder.as_mut() {
            Some(decoder) => decoder.process(stereo_in, out, frames),
            None => out[..needed].copy_from_slice(stereo_in),
        }
        Ok(needed)
    }
}
