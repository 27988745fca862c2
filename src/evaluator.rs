//! Single entry point over the derivative and impact maps.
//!
//! A harness calls [`DynamicsEvaluator::evaluate`] with [`Mode::Derivative`]
//! inside its integration step and once with [`Mode::Impact`] when its own
//! event detector reports heel strike.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dynamics::{state_derivative, Formulation};
use crate::error::{WalkerError, WalkerResult};
use crate::impact::impact;
use crate::params::WalkerParams;
use crate::state::WalkerState;

/// Which closed-form map to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// `(q1dot, q2dot, q1ddot, q2ddot)`
    Derivative,
    /// `(q2, q1, q1dot', q2dot')`
    Impact,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Derivative => "derivative",
            Self::Impact => "impact",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = WalkerError;

    /// Accepts the long names and the single-letter flags `s` (stance
    /// derivative) and `i` (impact).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "derivative" | "stance" | "s" => Ok(Self::Derivative),
            "impact" | "i" => Ok(Self::Impact),
            _ => Err(WalkerError::InvalidMode(s.to_string())),
        }
    }
}

impl TryFrom<char> for Mode {
    type Error = WalkerError;

    fn try_from(flag: char) -> Result<Self, Self::Error> {
        match flag.to_ascii_lowercase() {
            's' => Ok(Self::Derivative),
            'i' => Ok(Self::Impact),
            _ => Err(WalkerError::InvalidMode(flag.to_string())),
        }
    }
}

/// True when any output component is infinite or NaN.
pub fn is_degenerate(output: &[f64; 4]) -> bool {
    output.iter().any(|v| !v.is_finite())
}

/// Evaluator bound to one validated parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicsEvaluator {
    params: WalkerParams,
    formulation: Formulation,
}

impl DynamicsEvaluator {
    /// Validate `params` once and bind them with the passive formulation.
    pub fn new(params: WalkerParams) -> WalkerResult<Self> {
        if let Err(err) = params.validate() {
            debug!(error = %err, "rejected walker parameters");
            return Err(err);
        }
        debug!(?params, "bound walker parameters");
        Ok(Self {
            params,
            formulation: Formulation::Passive,
        })
    }

    #[must_use]
    pub fn with_formulation(mut self, formulation: Formulation) -> Self {
        self.formulation = formulation;
        self
    }

    pub fn params(&self) -> &WalkerParams {
        &self.params
    }

    pub fn formulation(&self) -> Formulation {
        self.formulation
    }

    /// Apply the map selected by `mode`.
    ///
    /// Singular configurations are not an error here: the IEEE result of the
    /// division is returned as-is.
    pub fn evaluate(&self, state: WalkerState, mode: Mode) -> WalkerResult<[f64; 4]> {
        apply(state, &self.params, self.formulation, mode)
    }

    /// Like [`evaluate`](Self::evaluate), but a non-finite output becomes
    /// [`WalkerError::NumericDegenerate`].
    pub fn evaluate_finite(&self, state: WalkerState, mode: Mode) -> WalkerResult<[f64; 4]> {
        let output = self.evaluate(state, mode)?;
        if is_degenerate(&output) {
            return Err(WalkerError::NumericDegenerate { mode, output });
        }
        Ok(output)
    }
}

/// Evaluate one state with explicitly supplied parameters and the passive
/// formulation.
pub fn evaluate(state: WalkerState, params: &WalkerParams, mode: Mode) -> WalkerResult<[f64; 4]> {
    params.validate()?;
    apply(state, params, Formulation::Passive, mode)
}

// Shared by both call contracts; runs per integration step, so no logging.
fn apply(
    state: WalkerState,
    params: &WalkerParams,
    formulation: Formulation,
    mode: Mode,
) -> WalkerResult<[f64; 4]> {
    state.validate()?;
    let output = match mode {
        Mode::Derivative => state_derivative(&state, params, formulation).to_array(),
        Mode::Impact => impact(&state, params).to_array(),
    };
    Ok(output)
}
