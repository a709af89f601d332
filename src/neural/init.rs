//! Default parameter initialization
//!
//! Every weight and bias of a layer is drawn from
//! `U(-1/sqrt(fan_in), 1/sqrt(fan_in))`, the default scheme deep-learning
//! frameworks apply to freshly built convolution and linear layers.

use ndarray::{Array, Dimension, ShapeBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};

use crate::error::{PareidoliaError, Result};

/// Half-width of the default initialization range
pub fn default_bound(fan_in: usize) -> f32 {
    1.0 / (fan_in as f32).sqrt()
}

/// Fill an array of the given shape with default-initialized values.
///
/// Values are drawn in logical (row-major) order, so a seeded generator
/// always produces the same array.
///
/// # Errors
/// `Internal` if `fan_in` is zero.
pub fn sample_uniform<Sh, D, R>(shape: Sh, fan_in: usize, rng: &mut R) -> Result<Array<f32, D>>
where
    Sh: ShapeBuilder<Dim = D>,
    D: Dimension,
    R: Rng + ?Sized,
{
    let bound = default_bound(fan_in);
    let distribution = Uniform::new(-bound, bound).map_err(|e| {
        PareidoliaError::internal(format!(
            "invalid init range for fan_in {}: {}",
            fan_in, e
        ))
    })?;

    Ok(Array::from_shape_simple_fn(shape, || distribution.sample(&mut *rng)))
}

/// Generator used for weight initialization
///
/// A fixed seed makes the network reproducible across runs; otherwise the
/// generator is seeded from the operating system.
pub fn init_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
