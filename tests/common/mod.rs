//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use pareidolia::audio::encode_wav;
use pareidolia::neural::{PareidoliaEngine, Topology};

/// Small network so most tests stay fast
pub fn small_topology() -> Topology {
    Topology {
        input_len: 32,
        conv1_channels: 4,
        conv2_channels: 8,
        kernel_size: 3,
        padding: 1,
        hidden: 16,
        output_samples: 64,
        segments: 1,
    }
}

pub fn small_engine(seed: u64) -> Arc<PareidoliaEngine> {
    Arc::new(PareidoliaEngine::new(small_topology(), Some(seed)).unwrap())
}

/// Full-size network, built once per test binary
pub fn default_engine() -> Arc<PareidoliaEngine> {
    static ENGINE: OnceLock<Arc<PareidoliaEngine>> = OnceLock::new();
    ENGINE
        .get_or_init(|| Arc::new(PareidoliaEngine::new(Topology::default(), Some(2024)).unwrap()))
        .clone()
}

/// Deterministic 16-bit test signal
pub fn test_signal(len: usize) -> Vec<i16> {
    (0..len)
        .map(|i| {
            let phase = i as f32 / len as f32 * std::f32::consts::TAU * 3.0;
            (phase.sin() * 20000.0) as i16
        })
        .collect()
}

pub fn mono_wav(len: usize, sample_rate: u32) -> Vec<u8> {
    encode_wav(&test_signal(len), sample_rate, 1).unwrap()
}
