//! Output configuration — which channel layout the player sends to the device.

use serde::{Deserialize, Serialize};

use crate::error::{DecoderError, check_sample_rate};

pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

/// Channel layout requested by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChannelMode {
    /// Raw stereo straight to the device.
    #[default]
    Stereo,
    /// Stereo decoded to 5.1 before output.
    #[serde(rename = "surround51", alias = "5.1")]
    Surround51,
}

impl ChannelMode {
    /// Interleaved channels per output frame.
    pub fn output_channels(self) -> usize {
        match self {
            ChannelMode::Stereo => 2,
            ChannelMode::Surround51 => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(default)]
    pub channel_mode: ChannelMode,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            channel_mode: ChannelMode::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl OutputConfig {
    pub fn new(channel_mode: ChannelMode, sample_rate: u32) -> Result<Self, DecoderError> {
        let config = Self {
            channel_mode,
            sample_rate,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config, e.g.
    /// `{"channelMode": "surround51", "sampleRate": 44100}`.
    pub fn from_json(json: &str) -> Result<Self, DecoderError> {
        let config: OutputConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, DecoderError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), DecoderError> {
        check_sample_rate(self.sample_rate).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_stereo_48k() {
        let config = OutputConfig::from_json("{}").unwrap();
        assert_eq!(config, OutputConfig::default());
        assert_eq!(config.channel_mode, ChannelMode::Stereo);
        assert_eq!(config.sample_rate, 48000);
    }

    #[test]
    fn parses_surround() {
        let config =
            OutputConfig::from_json(r#"{"channelMode": "surround51", "sampleRate": 44100}"#).unwrap();
        assert_eq!(config.channel_mode, ChannelMode::Surround51);
        assert_eq!(config.channel_mode.output_channels(), 6);
        assert_eq!(config.sample_rate, 44100);

        let config = OutputConfig::from_json(r#"{"channelMode": "5.1"}"#).unwrap();
        assert_eq!(config.channel_mode, ChannelMode::Surround51);
    }

    #[test]
    fn round_trips_through_json() {
        let config = OutputConfig::new(ChannelMode::Surround51, 96000).unwrap();
        let json = config.to_json().unwrap();
        assert_eq!(json, r#"{"channelMode":"surround51","sampleRate":96000}"#);
        assert_eq!(OutputConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            OutputConfig::from_json(r#"{"sampleRate": 0}"#),
            Err(DecoderError::InvalidSampleRate(0))
        );
        assert!(matches!(
            OutputConfig::from_json(r#"{"channelMode": "quad"}"#),
            Err(DecoderError::Config(_))
        ));
        assert!(OutputConfig::new(ChannelMode::Stereo, 0).is_err());
    }
}
