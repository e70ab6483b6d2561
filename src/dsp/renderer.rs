//! WAV renderer — decodes a stereo buffer to 5.1 and encodes it as WAV bytes.

use std::io::Cursor;

use super::decoder::{SURROUND_CHANNELS, SurroundDecoder};
use crate::error::DecoderError;

/// Decode interleaved stereo i16 PCM to 5.1 and return a 6-channel 16-bit
/// WAV file as bytes. A trailing half frame is dropped.
pub fn render_wav(stereo: &[i16], sample_rate: u32) -> Result<Vec<u8>, DecoderError> {
    let mut decoder = SurroundDecoder::new(sample_rate)?;
    decoder.reset();
    let pcm = decoder.decode(stereo);

    write_wav(&pcm, sample_rate, SURROUND_CHANNELS as u16)
}

/// Write interleaved i16 PCM as an in-memory WAV file. Layouts wider than
/// stereo get an extensible header whose channel mask follows the
/// `FL, FR, C, LFE, RL, RR` slot order.
pub fn write_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>, DecoderError> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let data_bytes = data_chunk_bytes(samples.len())?;

    let mut cursor = Cursor::new(Vec::with_capacity(68 + data_bytes as usize));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)?;
        for &sample in samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(cursor.into_inner())
}

/// Byte length of a 16-bit data chunk; the RIFF length field is 32 bits.
fn data_chunk_bytes(samples: usize) -> Result<u32, DecoderError> {
    samples
        .checked_mul(2)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| DecoderError::Wav(format!("{samples} samples exceed the WAV size limit")))
}
