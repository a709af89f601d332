//! Pareidolia - Mock Neural Audio Service
//!
//! Accepts a WAV upload, runs it through a fixed untrained network and two
//! scalar post-effects, and returns the result as JSON.
//!
//! # Architecture
//!
//! The request path is strictly linear:
//! - `audio`: decode WAV bytes, normalize 16-bit samples
//! - `neural`: forward pass through the fixed topology
//! - `effects`: delirium (gain) then chaos (Gaussian noise)
//! - `pipeline`: the stages above, transport-free
//! - `server`: axum router and JSON responses
//!
//! The network weights are random. Only the output shape is meaningful.

pub mod audio;
pub mod cli;
pub mod effects;
pub mod error;
pub mod neural;
pub mod pipeline;
pub mod server;

pub use error::{PareidoliaError, Result};
pub use pipeline::{TransformOutput, TransformPipeline};
