//! DSP — the stereo to 5.1 decoder and its building blocks.
//!
//! All processing is sample-accurate and deterministic. The decoder owns
//! every filter, phase shifter, and delay line it drives, so independent
//! streams need independent decoders and nothing is shared between them.

pub mod decoder;
pub mod delay;
pub mod filter;
pub mod output;
pub mod phase_shift;
pub mod renderer;
