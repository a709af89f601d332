//! Neural network stub
//!
//! This module provides:
//! - Inference-only `Conv1d` / `Linear` layers over ndarray
//! - Default uniform parameter initialization
//! - `PareidoliaEngine`, the fixed untrained topology

mod engine;
mod init;
mod layers;

pub use engine::{PareidoliaEngine, ProcessedAudio, Topology, INPUT_LENGTH, OUTPUT_SAMPLES};
pub use init::{default_bound, init_rng, sample_uniform};
pub use layers::{relu_inplace, Conv1d, Linear};
