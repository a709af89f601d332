//! WAV decoding for uploaded audio
//!
//! Uploads are decoded straight from memory. Only 16-bit integer PCM is
//! accepted since normalization assumes that range.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use super::samples::DecodedSamples;
use crate::error::{PareidoliaError, Result};

const SUPPORTED_BITS_PER_SAMPLE: u16 = 16;

/// Decode WAV bytes into raw 16-bit samples
///
/// # Errors
/// * `Decode` - If the bytes are not a readable WAV file
/// * `UnsupportedFormat` - If the file is not 16-bit integer PCM
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedSamples> {
    let mut reader = WavReader::new(Cursor::new(bytes)).map_err(|e| PareidoliaError::Decode {
        reason: format!("Failed to parse WAV header: {}", e),
        source: Some(e),
    })?;

    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != SUPPORTED_BITS_PER_SAMPLE
    {
        return Err(PareidoliaError::UnsupportedFormat {
            format: format!(
                "{}-bit {} audio (only 16-bit integer PCM supported)",
                spec.bits_per_sample,
                match spec.sample_format {
                    SampleFormat::Int => "integer",
                    SampleFormat::Float => "float",
                }
            ),
        });
    }

    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<i16>, _>>()
        .map_err(|e| PareidoliaError::Decode {
            reason: format!("Failed to read 16-bit samples: {}", e),
            source: Some(e),
        })?;

    Ok(DecodedSamples::new(samples, spec.sample_rate, spec.channels))
}

/// Encode 16-bit samples as an in-memory WAV file
///
/// Samples are written in the given order, so multi-channel data must
/// already be interleaved.
pub fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: SUPPORTED_BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec).map_err(wav_write_error)?;
        for &sample in samples {
            writer.write_sample(sample).map_err(wav_write_error)?;
        }
        writer.finalize().map_err(wav_write_error)?;
    }

    Ok(cursor.into_inner())
}

fn wav_write_error(e: hound::Error) -> PareidoliaError {
    match e {
        hound::Error::IoError(io) => PareidoliaError::Io(io),
        other => PareidoliaError::internal(format!("WAV encoding failed: {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_mono_16bit() {
        let samples: Vec<i16> = (0..128).map(|i| (i * 200 - 12800) as i16).collect();
        let bytes = encode_wav(&samples, 16000, 1).unwrap();

        let decoded = decode_wav(&bytes).unwrap();
        assert_eq!(decoded.sample_rate, 16000);
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.samples, samples);
    }

    #[test]
    fn test_decode_stereo_keeps_interleaving() {
        let samples = vec![1i16, -1, 2, -2, 3, -3];
        let bytes = encode_wav(&samples, 48000, 2).unwrap();

        let decoded = decode_wav(&bytes).unwrap();
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.len(), 6);
        assert_eq!(decoded.samples, samples);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_wav(b"definitely not a riff file");
        match result.unwrap_err() {
            PareidoliaError::Decode { reason, source } => {
                assert!(reason.contains("WAV header"));
                assert!(source.is_some());
            }
            other => panic!("Expected Decode error, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_empty_input() {
        assert!(matches!(
            decode_wav(&[]),
            Err(PareidoliaError::Decode { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_float_wav() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
            writer.write_sample(0.25f32).unwrap();
            writer.finalize().unwrap();
        }

        match decode_wav(&cursor.into_inner()).unwrap_err() {
            PareidoliaError::UnsupportedFormat { format } => {
                assert!(format.contains("32-bit float"));
            }
            other => panic!("Expected UnsupportedFormat, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_truncated_data() {
        let samples: Vec<i16> = vec![1000; 64];
        let mut bytes = encode_wav(&samples, 8000, 1).unwrap();
        // Chop off part of the data chunk while the header still claims 64 samples
        bytes.truncate(bytes.len() - 31);

        assert!(decode_wav(&bytes).is_err());
    }
}
