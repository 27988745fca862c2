//! Walker parameters
//!
//! Physical constants of the point-foot walker. There are no defaults: every
//! constant has to be supplied by the caller, either directly or from a TOML
//! parameter file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{WalkerError, WalkerResult};

/// Physical constants of the two-link walker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WalkerParams {
    /// Hip actuation torque scale (actuated formulation only)
    pub k: f64,
    /// Hip point mass
    pub m: f64,
    /// Foot point mass
    pub mp: f64,
    /// Gravitational acceleration
    pub g: f64,
    /// Leg length
    pub l: f64,
    /// Auxiliary constant, reserved for extended models
    pub c: f64,
    /// Ground slope [rad], reserved for the simulation harness
    pub slope: f64,
}

impl WalkerParams {
    /// Create new walker parameters
    pub fn new(k: f64, m: f64, mp: f64, g: f64, l: f64, c: f64, slope: f64) -> Self {
        Self {
            k,
            m,
            mp,
            g,
            l,
            c,
            slope,
        }
    }

    /// Check that every constant is finite, `m + mp > 0` and `l != 0`.
    pub fn validate(&self) -> WalkerResult<()> {
        for (field, value) in self.named_fields() {
            if !value.is_finite() {
                return Err(WalkerError::invalid_parameter(
                    field,
                    format!("must be finite, got {value}"),
                ));
            }
        }

        if self.m + self.mp <= 0.0 {
            return Err(WalkerError::invalid_parameter(
                "m + mp",
                format!("total mass must be > 0, got {}", self.m + self.mp),
            ));
        }

        if self.l == 0.0 {
            return Err(WalkerError::invalid_parameter(
                "l",
                "leg length must be non-zero",
            ));
        }

        Ok(())
    }

    /// Parse and validate parameters from a TOML document.
    pub fn from_toml_str(raw: &str) -> WalkerResult<Self> {
        let params: WalkerParams = toml::from_str(raw).map_err(|e| {
            // missing/unknown keys are named between backticks, type errors
            // only carry the span of the bad value
            let field = e
                .message()
                .split('`')
                .nth(1)
                .or_else(|| e.span().and_then(|span| key_at(raw, span.start)))
                .unwrap_or("<document>");
            WalkerError::invalid_parameter(field, e.to_string().trim_end())
        })?;
        params.validate()?;
        Ok(params)
    }

    /// Read, parse and validate a TOML parameter file.
    pub fn from_toml_file(path: &Path) -> WalkerResult<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    fn named_fields(&self) -> [(&'static str, f64); 7] {
        [
            ("k", self.k),
            ("m", self.m),
            ("mp", self.mp),
            ("g", self.g),
            ("l", self.l),
            ("c", self.c),
            ("slope", self.slope),
        ]
    }
}

/// Key of the `key = value` line containing byte `offset`.
fn key_at(raw: &str, offset: usize) -> Option<&str> {
    let line_start = raw.get(..offset)?.rfind('\n').map_or(0, |i| i + 1);
    let line = raw[line_start..].lines().next()?;
    let (key, _) = line.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then_some(key)
}
