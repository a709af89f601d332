//! Inference-only layers
//!
//! Layers own their parameters and are never mutated after construction,
//! so a forward pass only needs `&self`.

use ndarray::{s, Array1, Array2, Array3, ArrayBase, ArrayView1, ArrayView2, Axis, DataMut, Dimension};
use rand::Rng;

use super::init::sample_uniform;
use crate::error::{PareidoliaError, Result};

/// Clamp negative values to zero in place
pub fn relu_inplace<S, D>(x: &mut ArrayBase<S, D>)
where
    S: DataMut<Elem = f32>,
    D: Dimension,
{
    x.mapv_inplace(|v| v.max(0.0));
}

/// 1-D convolution over a `(channels, length)` input
///
/// Cross-correlation with symmetric zero padding. Weights are laid out
/// `(out_channels, in_channels, kernel_size)`.
#[derive(Debug, Clone)]
pub struct Conv1d {
    weight: Array3<f32>,
    bias: Array1<f32>,
    padding: usize,
}

impl Conv1d {
    /// Build a layer from explicit parameters.
    ///
    /// # Errors
    /// `Internal` if the bias length does not match the output channels.
    pub fn from_parts(weight: Array3<f32>, bias: Array1<f32>, padding: usize) -> Result<Self> {
        if weight.dim().0 != bias.len() {
            return Err(PareidoliaError::internal(format!(
                "conv1d bias has {} entries for {} output channels",
                bias.len(),
                weight.dim().0
            )));
        }
        Ok(Self {
            weight,
            bias,
            padding,
        })
    }

    /// Randomly initialize with the default `U(-1/sqrt(fan_in), 1/sqrt(fan_in))` scheme.
    pub fn init<R: Rng + ?Sized>(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        padding: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let fan_in = in_channels * kernel_size;
        let weight = sample_uniform((out_channels, in_channels, kernel_size), fan_in, rng)?;
        let bias = sample_uniform(out_channels, fan_in, rng)?;
        Self::from_parts(weight, bias, padding)
    }

    pub fn in_channels(&self) -> usize {
        self.weight.dim().1
    }

    pub fn out_channels(&self) -> usize {
        self.weight.dim().0
    }

    pub fn kernel_size(&self) -> usize {
        self.weight.dim().2
    }

    pub fn parameter_count(&self) -> usize {
        self.weight.len() + self.bias.len()
    }

    /// Sequence length produced for an input of `input_len` samples
    pub fn output_len(&self, input_len: usize) -> usize {
        (input_len + 2 * self.padding + 1).saturating_sub(self.kernel_size())
    }

    pub fn forward(&self, x: ArrayView2<f32>) -> Result<Array2<f32>> {
        let (in_channels, len) = x.dim();
        if in_channels != self.in_channels() {
            return Err(PareidoliaError::internal(format!(
                "conv1d expects {} input channels, got {}",
                self.in_channels(),
                in_channels
            )));
        }

        let out_len = self.output_len(len);
        let mut out = Array2::zeros((self.out_channels(), out_len));
        if out_len == 0 {
            return Ok(out);
        }

        let mut padded = Array2::zeros((in_channels, len + 2 * self.padding));
        padded
            .slice_mut(s![.., self.padding..self.padding + len])
            .assign(&x);

        // One (out, in) x (in, out_len) product per kernel tap
        for tap in 0..self.kernel_size() {
            let w_tap = self.weight.index_axis(Axis(2), tap);
            let window = padded.slice(s![.., tap..tap + out_len]);
            out += &w_tap.dot(&window);
        }
        out += &self.bias.view().insert_axis(Axis(1));

        Ok(out)
    }
}

/// Fully-connected layer, weights laid out `(out_features, in_features)`
#[derive(Debug, Clone)]
pub struct Linear {
    weight: Array2<f32>,
    bias: Array1<f32>,
}

impl Linear {
    pub fn from_parts(weight: Array2<f32>, bias: Array1<f32>) -> Result<Self> {
        if weight.nrows() != bias.len() {
            return Err(PareidoliaError::internal(format!(
                "linear bias has {} entries for {} outputs",
                bias.len(),
                weight.nrows()
            )));
        }
        Ok(Self { weight, bias })
    }

    pub fn init<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        rng: &mut R,
    ) -> Result<Self> {
        let weight = sample_uniform((out_features, in_features), in_features, rng)?;
        let bias = sample_uniform(out_features, in_features, rng)?;
        Self::from_parts(weight, bias)
    }

    pub fn in_features(&self) -> usize {
        self.weight.ncols()
    }

    pub fn out_features(&self) -> usize {
        self.weight.nrows()
    }

    pub fn parameter_count(&self) -> usize {
        self.weight.len() + self.bias.len()
    }

    pub fn forward(&self, x: ArrayView1<f32>) -> Result<Array1<f32>> {
        if x.len() != self.in_features() {
            return Err(PareidoliaError::internal(format!(
                "linear layer expects {} inputs, got {}",
                self.in_features(),
                x.len()
            )));
        }
        Ok(self.weight.dot(&x) + &self.bias)
    }
}
