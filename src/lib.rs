pub mod config;
pub mod dsp;
pub mod error;

pub use config::{ChannelMode, OutputConfig};
pub use dsp::decoder::{SurroundChannel, SurroundDecoder};
pub use dsp::output::OutputStage;
pub use error::DecoderError;

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the crate version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Decode interleaved stereo i16 PCM to interleaved 5.1
/// (`FL, FR, C, LFE, RL, RR`) with a fresh decoder.
pub fn upmix(stereo: &[i16], sample_rate: u32) -> Result<Vec<i16>, DecoderError> {
    let mut decoder = SurroundDecoder::new(sample_rate)?;
    decoder.reset();
    Ok(decoder.decode(stereo))
}

/// WASM-exposed: decode interleaved stereo samples to interleaved 5.1.
#[wasm_bindgen]
pub fn upmix_stereo(samples: &[i16], sample_rate: u32) -> Result<Vec<i16>, JsValue> {
    upmix(samples, sample_rate).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: decode interleaved stereo samples to a 6-channel WAV.
#[wasm_bindgen]
pub fn upmix_stereo_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    dsp::renderer::render_wav(samples, sample_rate).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: the default output config as a JS object.
#[wasm_bindgen]
pub fn default_output_config() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&OutputConfig::default())
        .map_err(|e| JsValue::from_str(&format!("{e}")))
}
