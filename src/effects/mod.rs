//! Post-processing effects
//!
//! Two scalar-parameterized effects run after the forward pass:
//! `Delirium` (gain) followed by `Chaos` (additive Gaussian noise).
//! `DeepDream` optionally runs last, and also stands alone behind
//! `POST /deep_dream`.

mod dream;
mod params;
mod post;

pub use dream::{DeepDream, DEFAULT_DREAM_ITERATIONS, DREAM_BATCH_SIZE, MAX_DREAM_ITERATIONS};
pub use params::{parse_flag, EffectParams, DEFAULT_CHAOS, DEFAULT_DELIRIUM};
pub use post::{Chaos, Delirium, PostEffect, PostProcessor};
