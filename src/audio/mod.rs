//! Audio input handling
//!
//! - WAV decoding from in-memory upload bytes
//! - Sample containers and 16-bit normalization

mod samples;
mod wav;

pub use samples::{DecodedSamples, NormalizedSamples, PCM16_SCALE};
pub use wav::{decode_wav, encode_wav};
