//! Transform pipeline
//!
//! `decode → normalize → forward → post-process` for one upload. The
//! pipeline is transport-free: the HTTP handler and the offline CLI both
//! drive it and decide how to present the result.

use std::path::Path;
use std::sync::Arc;

use rand::RngCore;
use tracing::debug;

use crate::audio::decode_wav;
use crate::effects::{EffectParams, PostProcessor};
use crate::error::Result;
use crate::neural::{PareidoliaEngine, ProcessedAudio};

/// Result of one successful pass
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub audio: ProcessedAudio,
    /// Sample rate declared by the input file, echoed unchanged
    pub sample_rate: u32,
}

/// Shared entry point into the engine
#[derive(Debug, Clone)]
pub struct TransformPipeline {
    engine: Arc<PareidoliaEngine>,
}

impl TransformPipeline {
    pub fn new(engine: Arc<PareidoliaEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &PareidoliaEngine {
        &self.engine
    }

    /// Run WAV bytes through the full pipeline.
    ///
    /// Stops at the first failing stage; nothing partial is returned.
    pub fn process(
        &self,
        wav_bytes: &[u8],
        params: &EffectParams,
        rng: &mut dyn RngCore,
    ) -> Result<TransformOutput> {
        let post = PostProcessor::new(params)?;

        let decoded = decode_wav(wav_bytes)?;
        debug!(
            samples = decoded.len(),
            channels = decoded.channels,
            sample_rate = decoded.sample_rate,
            "decoded upload"
        );

        self.engine.check_input_len(decoded.len())?;

        let normalized = decoded.normalize();
        let mut audio = self.engine.forward(normalized.as_slice())?;
        post.process(&mut audio, rng)?;

        Ok(TransformOutput {
            audio,
            sample_rate: normalized.sample_rate,
        })
    }

    /// Run a WAV file from disk through the pipeline.
    pub fn process_file(
        &self,
        path: &Path,
        params: &EffectParams,
        rng: &mut dyn RngCore,
    ) -> Result<TransformOutput> {
        let bytes = std::fs::read(path)?;
        self.process(&bytes, params, rng)
    }
}
