//! Delirium and chaos post-effects
//!
//! Applied to the network output in a fixed order: scale, then noise,
//! then the optional deep-dream pass. None of them resamples or changes
//! the length of the audio.

use rand::RngCore;
use rand_distr::{Distribution, Normal};

use super::dream::DeepDream;
use super::params::EffectParams;
use crate::error::{PareidoliaError, Result};
use crate::neural::ProcessedAudio;

/// Base trait for post-processing effects
pub trait PostEffect: Send + Sync {
    /// Process the audio in place
    ///
    /// Effects that need randomness draw it from `rng`; deterministic
    /// effects ignore it.
    fn process(&self, audio: &mut ProcessedAudio, rng: &mut dyn RngCore) -> Result<()>;

    /// Get the effect type identifier
    fn effect_type(&self) -> &'static str;
}

/// Multiply every sample by a scalar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delirium {
    intensity: f32,
}

impl Delirium {
    pub fn new(intensity: f32) -> Self {
        Self { intensity }
    }
}

impl PostEffect for Delirium {
    fn process(&self, audio: &mut ProcessedAudio, _rng: &mut dyn RngCore) -> Result<()> {
        let intensity = self.intensity;
        audio.samples_mut().mapv_inplace(|v| v * intensity);
        Ok(())
    }

    fn effect_type(&self) -> &'static str {
        "delirium"
    }
}

/// Add zero-mean Gaussian noise, drawn independently per sample
#[derive(Debug, Clone, Copy)]
pub struct Chaos {
    distribution: Normal<f32>,
}

impl Chaos {
    /// # Errors
    /// `InvalidParameter` if `level` is negative or not finite.
    pub fn new(level: f32) -> Result<Self> {
        if !level.is_finite() || level < 0.0 {
            return Err(PareidoliaError::invalid_parameter(
                "chaos",
                &level.to_string(),
                "noise standard deviation must be finite and non-negative",
            ));
        }
        let distribution = Normal::new(0.0, level).map_err(|e| {
            PareidoliaError::invalid_parameter("chaos", &level.to_string(), e.to_string())
        })?;
        Ok(Self { distribution })
    }
}

impl PostEffect for Chaos {
    fn process(&self, audio: &mut ProcessedAudio, rng: &mut dyn RngCore) -> Result<()> {
        for sample in audio.samples_mut().iter_mut() {
            *sample += self.distribution.sample(&mut *rng);
        }
        Ok(())
    }

    fn effect_type(&self) -> &'static str {
        "chaos"
    }
}

/// The delirium → chaos (→ deep dream) chain for one request
#[derive(Debug, Clone, Copy)]
pub struct PostProcessor {
    delirium: Delirium,
    chaos: Chaos,
    dream: Option<DeepDream>,
}

impl PostProcessor {
    pub fn new(params: &EffectParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            delirium: Delirium::new(params.delirium),
            chaos: Chaos::new(params.chaos)?,
            dream: params.deep_dream.then(DeepDream::single),
        })
    }

    pub fn process(&self, audio: &mut ProcessedAudio, rng: &mut dyn RngCore) -> Result<()> {
        let mut effects: Vec<&dyn PostEffect> = Vec::with_capacity(3);
        effects.push(&self.delirium);
        effects.push(&self.chaos);
        if let Some(dream) = &self.dream {
            effects.push(dream);
        }
        for effect in effects {
            effect.process(audio, rng)?;
            tracing::trace!(effect = effect.effect_type(), "applied post effect");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn audio(values: Vec<f32>) -> ProcessedAudio {
        let len = values.len();
        ProcessedAudio::from_array(Array3::from_shape_vec((1, 1, len), values).unwrap())
    }

    #[test]
    fn test_delirium_scales() {
        let mut buffer = audio(vec![1.0, -2.0, 0.5]);
        let mut rng = StdRng::seed_from_u64(0);
        Delirium::new(0.5).process(&mut buffer, &mut rng).unwrap();
        assert_eq!(buffer.samples().as_slice().unwrap(), &[0.5, -1.0, 0.25]);
    }

    #[test]
    fn test_zero_chaos_adds_nothing() {
        let original = audio(vec![0.1, -0.2, 0.3, 7.0]);
        let mut buffer = original.clone();
        let mut rng = StdRng::seed_from_u64(0);
        Chaos::new(0.0).unwrap().process(&mut buffer, &mut rng).unwrap();
        assert_eq!(buffer, original);
    }

    #[test]
    fn test_chaos_statistics() {
        let mut buffer = audio(vec![0.0; 20_000]);
        let mut rng = StdRng::seed_from_u64(1234);
        Chaos::new(0.3).unwrap().process(&mut buffer, &mut rng).unwrap();

        let n = buffer.len() as f64;
        let mean = buffer.samples().iter().map(|&v| v as f64).sum::<f64>() / n;
        let var = buffer
            .samples()
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        assert!(mean.abs() < 0.02, "mean too far from zero: {}", mean);
        assert_relative_eq!(var.sqrt(), 0.3, epsilon = 0.02);
    }

    #[test]
    fn test_negative_chaos_rejected() {
        for level in [-1.0, -f32::MIN_POSITIVE, f32::NEG_INFINITY, f32::NAN] {
            match Chaos::new(level) {
                Err(PareidoliaError::InvalidParameter { name, .. }) => assert_eq!(name, "chaos"),
                other => panic!("Expected InvalidParameter for {}, got: {:?}", level, other),
            }
        }
    }

    #[test]
    fn test_processor_applies_deep_dream_last() {
        let params = EffectParams::new(1.0, 0.0).unwrap().with_deep_dream(true);
        let processor = PostProcessor::new(&params).unwrap();

        let mut processed = audio(vec![0.0, 1.0, -1.0]);
        processor
            .process(&mut processed, &mut StdRng::seed_from_u64(0))
            .unwrap();

        for (out, x) in processed.samples().iter().zip([0.0f32, 1.0, -1.0]) {
            assert_relative_eq!(*out, (1.2 * x + 0.1).tanh() * 0.8, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_processor_scales_then_adds_noise() {
        let params = EffectParams::new(2.0, 0.1).unwrap();
        let processor = PostProcessor::new(&params).unwrap();
        let input = vec![1.0f32, -1.0, 0.25, 0.0];

        let mut processed = audio(input.clone());
        processor
            .process(&mut processed, &mut StdRng::seed_from_u64(8))
            .unwrap();

        // Same noise stream applied to zeros isolates the noise term
        let mut noise = audio(vec![0.0; input.len()]);
        Chaos::new(0.1)
            .unwrap()
            .process(&mut noise, &mut StdRng::seed_from_u64(8))
            .unwrap();

        for ((out, x), n) in processed
            .samples()
            .iter()
            .zip(input.iter())
            .zip(noise.samples().iter())
        {
            assert_eq!(*out, x * 2.0 + n);
        }
    }
}
