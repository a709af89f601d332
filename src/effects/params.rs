//! Per-request effect parameters

use serde::{Deserialize, Serialize};

use crate::error::{PareidoliaError, Result};

pub const DEFAULT_DELIRIUM: f32 = 0.5;
pub const DEFAULT_CHAOS: f32 = 0.3;

/// Scalars controlling post-processing
///
/// - `delirium`: gain applied to the network output (any finite value)
/// - `chaos`: standard deviation of the added Gaussian noise (finite, >= 0)
/// - `deep_dream`: run one deep-dream pass after the noise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectParams {
    pub delirium: f32,
    pub chaos: f32,
    #[serde(default)]
    pub deep_dream: bool,
}

impl Default for EffectParams {
    fn default() -> Self {
        Self {
            delirium: DEFAULT_DELIRIUM,
            chaos: DEFAULT_CHAOS,
            deep_dream: false,
        }
    }
}

impl EffectParams {
    pub fn new(delirium: f32, chaos: f32) -> Result<Self> {
        let params = Self {
            delirium,
            chaos,
            deep_dream: false,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_deep_dream(mut self, deep_dream: bool) -> Self {
        self.deep_dream = deep_dream;
        self
    }

    /// Parse raw form values, defaulting absent fields.
    ///
    /// A field that is present but not a finite decimal is rejected rather
    /// than silently replaced by its default.
    pub fn from_fields(delirium: Option<&str>, chaos: Option<&str>) -> Result<Self> {
        let delirium = match delirium {
            Some(raw) => parse_decimal("delirium", raw)?,
            None => DEFAULT_DELIRIUM,
        };
        let chaos = match chaos {
            Some(raw) => parse_decimal("chaos", raw)?,
            None => DEFAULT_CHAOS,
        };
        Self::new(delirium, chaos)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.delirium.is_finite() {
            return Err(PareidoliaError::invalid_parameter(
                "delirium",
                &self.delirium.to_string(),
                "must be finite",
            ));
        }
        if !self.chaos.is_finite() || self.chaos < 0.0 {
            return Err(PareidoliaError::invalid_parameter(
                "chaos",
                &self.chaos.to_string(),
                "noise standard deviation must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Parse a boolean form field.
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off` in any case;
/// an empty value counts as false.
pub fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(PareidoliaError::invalid_parameter(name, raw, "expected a boolean")),
    }
}

fn parse_decimal(name: &str, raw: &str) -> Result<f32> {
    let value = raw
        .trim()
        .parse::<f32>()
        .map_err(|_| PareidoliaError::invalid_parameter(name, raw, "not a decimal number"))?;
    if !value.is_finite() {
        return Err(PareidoliaError::invalid_parameter(name, raw, "must be finite"));
    }
    Ok(value)
}
