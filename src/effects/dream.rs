//! Deep-dream style waveshaping
//!
//! Samples are walked in 128-sample batches and pushed through
//! `tanh(1.2 * x + 0.1) * 0.8`, once per iteration. Every band of a batch
//! gets the same curve, so the transform is per-sample and any input
//! length is accepted.

use ndarray::{ArrayViewMut1, Axis};
use rand::RngCore;

use super::post::PostEffect;
use crate::error::{PareidoliaError, Result};
use crate::neural::ProcessedAudio;

pub const DREAM_BATCH_SIZE: usize = 128;
pub const DEFAULT_DREAM_ITERATIONS: u32 = 1;
/// Upper bound on passes per request
pub const MAX_DREAM_ITERATIONS: u32 = 100;

const DREAM_GAIN: f32 = 1.2;
const DREAM_SHIFT: f32 = 0.1;
const DREAM_LEVEL: f32 = 0.8;

/// Repeated saturating waveshaper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeepDream {
    iterations: u32,
}

impl DeepDream {
    /// # Errors
    /// `InvalidParameter` if `iterations` exceeds [`MAX_DREAM_ITERATIONS`].
    pub fn new(iterations: u32) -> Result<Self> {
        if iterations > MAX_DREAM_ITERATIONS {
            return Err(PareidoliaError::invalid_parameter(
                "iterations",
                &iterations.to_string(),
                format!("at most {} passes allowed", MAX_DREAM_ITERATIONS),
            ));
        }
        Ok(Self { iterations })
    }

    /// One pass, as applied after the chaos stage
    pub fn single() -> Self {
        Self {
            iterations: DEFAULT_DREAM_ITERATIONS,
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Transform a flat sample buffer in place
    pub fn apply(&self, mut samples: ArrayViewMut1<f32>) {
        for _ in 0..self.iterations {
            for mut batch in samples.axis_chunks_iter_mut(Axis(0), DREAM_BATCH_SIZE) {
                batch.mapv_inplace(dream_curve);
            }
        }
    }

    pub fn apply_slice(&self, samples: &mut [f32]) {
        self.apply(ArrayViewMut1::from(samples));
    }
}

fn dream_curve(x: f32) -> f32 {
    (DREAM_GAIN * x + DREAM_SHIFT).tanh() * DREAM_LEVEL
}

impl PostEffect for DeepDream {
    fn process(&self, audio: &mut ProcessedAudio, _rng: &mut dyn RngCore) -> Result<()> {
        for lane in audio.samples_mut().lanes_mut(Axis(2)) {
            self.apply(lane);
        }
        Ok(())
    }

    fn effect_type(&self) -> &'static str {
        "deep_dream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_single_pass_curve() {
        let mut samples = vec![0.0f32, 0.5, -0.5, 1.0, -1.0];
        DeepDream::single().apply_slice(&mut samples);

        assert_relative_eq!(samples[0], 0.1f32.tanh() * 0.8, epsilon = 1e-6);
        assert_relative_eq!(samples[1], 0.7f32.tanh() * 0.8, epsilon = 1e-6);
        assert_relative_eq!(samples[2], (-0.5f32).tanh() * 0.8, epsilon = 1e-6);
        assert_relative_eq!(samples[3], 1.3f32.tanh() * 0.8, epsilon = 1e-6);
        assert_relative_eq!(samples[4], (-1.1f32).tanh() * 0.8, epsilon = 1e-6);
    }

    #[test]
    fn test_iterations_compose() {
        let input: Vec<f32> = (0..300).map(|i| (i as f32 / 150.0) - 1.0).collect();

        let mut twice = input.clone();
        DeepDream::new(2).unwrap().apply_slice(&mut twice);

        let mut once_then_once = input;
        DeepDream::single().apply_slice(&mut once_then_once);
        DeepDream::single().apply_slice(&mut once_then_once);

        assert_eq!(twice, once_then_once);
    }

    #[test]
    fn test_partial_batch_is_transformed() {
        // 130 samples: one full batch and a two-sample tail
        let mut samples = vec![2.0f32; DREAM_BATCH_SIZE + 2];
        DeepDream::single().apply_slice(&mut samples);

        let expected = dream_curve(2.0);
        assert!(samples.iter().all(|&v| v == expected));
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let mut samples = vec![0.3f32, -0.7, 5.0];
        DeepDream::new(0).unwrap().apply_slice(&mut samples);
        assert_eq!(samples, vec![0.3, -0.7, 5.0]);
    }

    #[test]
    fn test_output_stays_within_level() {
        let mut samples = vec![1e6f32, -1e6, 0.0, 42.0];
        DeepDream::new(5).unwrap().apply_slice(&mut samples);
        assert!(samples.iter().all(|v| v.abs() <= DREAM_LEVEL));
    }

    #[test]
    fn test_too_many_iterations_rejected() {
        assert!(DeepDream::new(MAX_DREAM_ITERATIONS).is_ok());
        match DeepDream::new(MAX_DREAM_ITERATIONS + 1).unwrap_err() {
            PareidoliaError::InvalidParameter { name, .. } => assert_eq!(name, "iterations"),
            other => panic!("Expected InvalidParameter, got: {:?}", other),
        }
    }

    #[test]
    fn test_effect_covers_every_segment() {
        let mut audio = ProcessedAudio::from_array(Array3::zeros((2, 1, 3)));
        DeepDream::single()
            .process(&mut audio, &mut StdRng::seed_from_u64(0))
            .unwrap();

        let expected = dream_curve(0.0);
        assert!(audio.samples().iter().all(|&v| v == expected));
    }
}
