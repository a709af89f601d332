//! Decoded and normalized sample containers

use serde::{Deserialize, Serialize};

/// Divisor mapping signed 16-bit PCM onto [-1.0, 1.0)
pub const PCM16_SCALE: f32 = 32768.0;

/// Samples exactly as stored in the uploaded file
///
/// Multi-channel files stay interleaved in file order; the network treats
/// the whole sequence as a single channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedSamples {
    pub samples: Vec<i16>,
    /// Rate declared by the file header, never resampled
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedSamples {
    pub fn new(samples: Vec<i16>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Convert to `f32` and divide by 32768.
    ///
    /// No clipping is applied: `32767` maps to `0.99996948`, `-32768` to `-1.0`.
    pub fn normalize(&self) -> NormalizedSamples {
        NormalizedSamples {
            samples: self
                .samples
                .iter()
                .map(|&s| s as f32 / PCM16_SCALE)
                .collect(),
            sample_rate: self.sample_rate,
        }
    }
}

/// Floating-point samples ready for the forward pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSamples {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl NormalizedSamples {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }
}
