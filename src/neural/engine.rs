//! The fixed, untrained Pareidolia network
//!
//! Topology (defaults):
//! ```text
//! input (1, 128)
//!   -> Conv1d(1 -> 32, k=3, p=1) -> ReLU
//!   -> Conv1d(32 -> 64, k=3, p=1) -> ReLU
//!   -> flatten (64 * 128)
//!   -> Linear(8192 -> 512) -> ReLU
//!   -> Linear(512 -> segments * 44100)
//!   -> reshape (segments, 1, 44100)
//! ```
//!
//! Weights are random and never trained, so the output carries no meaning
//! beyond its shape. Input that does not reach the flatten step with exactly
//! `input_len` samples is rejected instead of padded or truncated.

use ndarray::{Array3, ArrayView2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::init::init_rng;
use super::layers::{relu_inplace, Conv1d, Linear};
use crate::error::{PareidoliaError, Result};

/// Sequence length the flatten step requires
pub const INPUT_LENGTH: usize = 128;

/// Samples per output segment: one second at 44.1kHz
pub const OUTPUT_SAMPLES: usize = 44100;

/// Layer dimensions of the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Sequence length entering the flatten step
    pub input_len: usize,
    pub conv1_channels: usize,
    pub conv2_channels: usize,
    pub kernel_size: usize,
    pub padding: usize,
    pub hidden: usize,
    /// Samples per output segment
    pub output_samples: usize,
    /// Number of stacked `(1, output_samples)` blocks produced per pass
    pub segments: usize,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            input_len: INPUT_LENGTH,
            conv1_channels: 32,
            conv2_channels: 64,
            kernel_size: 3,
            padding: 1,
            hidden: 512,
            output_samples: OUTPUT_SAMPLES,
            segments: 1,
        }
    }
}

impl Topology {
    /// Width of the flattened convolution output
    pub fn flat_len(&self) -> usize {
        self.conv2_channels * self.input_len
    }

    /// Width of the final linear layer
    pub fn output_len(&self) -> usize {
        self.segments * self.output_samples
    }

    pub fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Total number of weights and biases
    pub fn parameter_count(&self) -> usize {
        let conv1 = self.conv1_channels * self.kernel_size + self.conv1_channels;
        let conv2 = self.conv2_channels * self.conv1_channels * self.kernel_size
            + self.conv2_channels;
        let fc1 = self.flat_len() * self.hidden + self.hidden;
        let fc2 = self.hidden * self.output_len() + self.output_len();
        conv1 + conv2 + fc1 + fc2
    }

    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("input_len", self.input_len),
            ("conv1_channels", self.conv1_channels),
            ("conv2_channels", self.conv2_channels),
            ("kernel_size", self.kernel_size),
            ("hidden", self.hidden),
            ("output_samples", self.output_samples),
            ("segments", self.segments),
        ];
        if let Some((name, _)) = dims.iter().find(|(_, value)| *value == 0) {
            return Err(PareidoliaError::invalid_parameter(
                name,
                "0",
                "topology dimensions must be non-zero",
            ));
        }
        Ok(())
    }
}

/// Forward pass output, shape `(segments, 1, output_samples)`
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedAudio {
    data: Array3<f32>,
}

impl ProcessedAudio {
    pub fn from_array(data: Array3<f32>) -> Self {
        Self { data }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn samples(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn samples_mut(&mut self) -> &mut Array3<f32> {
        &mut self.data
    }

    /// Nested `[segment][channel][sample]` vectors for JSON output
    pub fn to_nested(&self) -> Vec<Vec<Vec<f32>>> {
        self.data
            .outer_iter()
            .map(|segment| segment.outer_iter().map(|channel| channel.to_vec()).collect())
            .collect()
    }
}

/// Untrained network with immutable parameters
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct PareidoliaEngine {
    topology: Topology,
    seed: Option<u64>,
    conv1: Conv1d,
    conv2: Conv1d,
    fc1: Linear,
    fc2: Linear,
}

impl PareidoliaEngine {
    /// Initialize a network, seeded if `seed` is given.
    pub fn new(topology: Topology, seed: Option<u64>) -> Result<Self> {
        let mut rng = init_rng(seed);
        let mut engine = Self::with_rng(topology, &mut rng)?;
        engine.seed = seed;
        Ok(engine)
    }

    /// Initialize a network from an explicit generator.
    ///
    /// Layers draw their parameters in forward order (conv1, conv2, fc1,
    /// fc2), weights before biases.
    pub fn with_rng<R: Rng + ?Sized>(topology: Topology, rng: &mut R) -> Result<Self> {
        topology.validate()?;

        let conv1 = Conv1d::init(
            1,
            topology.conv1_channels,
            topology.kernel_size,
            topology.padding,
            rng,
        )?;
        let conv2 = Conv1d::init(
            topology.conv1_channels,
            topology.conv2_channels,
            topology.kernel_size,
            topology.padding,
            rng,
        )?;
        let fc1 = Linear::init(topology.flat_len(), topology.hidden, rng)?;
        let fc2 = Linear::init(topology.hidden, topology.output_len(), rng)?;

        Ok(Self {
            topology,
            seed: None,
            conv1,
            conv2,
            fc1,
            fc2,
        })
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn parameter_count(&self) -> usize {
        self.conv1.parameter_count()
            + self.conv2.parameter_count()
            + self.fc1.parameter_count()
            + self.fc2.parameter_count()
    }

    /// Sequence length reaching the flatten step for `input_len` samples
    pub fn conv_output_len(&self, input_len: usize) -> usize {
        self.conv2.output_len(self.conv1.output_len(input_len))
    }

    /// Reject an input length before any activation is allocated.
    ///
    /// # Errors
    /// `ShapeMismatch` if `input_len` samples would not reach the flatten
    /// step as exactly `topology.input_len` samples.
    pub fn check_input_len(&self, input_len: usize) -> Result<()> {
        let len = self.conv_output_len(input_len);
        if len != self.topology.input_len {
            return Err(PareidoliaError::ShapeMismatch {
                expected: self.topology.input_len,
                actual: len,
            });
        }
        Ok(())
    }

    /// Run one forward pass over a single-channel sequence.
    ///
    /// # Errors
    /// `ShapeMismatch` if the sequence length after both convolutions is not
    /// `topology.input_len`.
    pub fn forward(&self, input: &[f32]) -> Result<ProcessedAudio> {
        self.check_input_len(input.len())?;
        let x = ArrayView2::from_shape((1, input.len()), input)?;

        let mut h = self.conv1.forward(x)?;
        relu_inplace(&mut h);
        let mut h = self.conv2.forward(h.view())?;
        relu_inplace(&mut h);

        // Channel-major, matching a row-major view of (channels, length)
        let flat = h.into_shape_with_order(self.topology.flat_len())?;

        let mut hidden = self.fc1.forward(flat.view())?;
        relu_inplace(&mut hidden);
        let out = self.fc2.forward(hidden.view())?;

        let data = out.into_shape_with_order((
            self.topology.segments,
            1,
            self.topology.output_samples,
        ))?;
        debug!(
            input_len = input.len(),
            output_shape = ?data.dim(),
            "forward pass complete"
        );

        Ok(ProcessedAudio::from_array(data))
    }
}
