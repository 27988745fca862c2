//! Walker state representation
//!
//! The state is the ordered 4-tuple:
//! - q1: stance-leg angle [rad]
//! - q2: swing-leg angle [rad], same reference as q1
//! - q1dot: stance-leg angular velocity [rad/s]
//! - q2dot: swing-leg angular velocity [rad/s]

use serde::{Deserialize, Serialize};

use crate::error::{WalkerError, WalkerResult};

/// State of the two-link walker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkerState {
    /// Stance-leg angle
    pub q1: f64,
    /// Swing-leg angle
    pub q2: f64,
    /// Stance-leg angular velocity
    pub q1dot: f64,
    /// Swing-leg angular velocity
    pub q2dot: f64,
}

impl WalkerState {
    /// Create a new walker state
    pub fn new(q1: f64, q2: f64, q1dot: f64, q2dot: f64) -> Self {
        Self {
            q1,
            q2,
            q1dot,
            q2dot,
        }
    }

    /// Inter-leg angle `d = q1 - q2`
    pub fn leg_separation(&self) -> f64 {
        self.q1 - self.q2
    }

    /// Reject states with a non-finite component.
    pub fn validate(&self) -> WalkerResult<()> {
        let fields = [
            ("q1", self.q1),
            ("q2", self.q2),
            ("q1dot", self.q1dot),
            ("q2dot", self.q2dot),
        ];
        match fields.iter().find(|(_, value)| !value.is_finite()) {
            Some(&(field, value)) => Err(WalkerError::InvalidState {
                field: field.to_string(),
                value,
            }),
            None => Ok(()),
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.q1, self.q2, self.q1dot, self.q2dot]
    }
}

impl From<[f64; 4]> for WalkerState {
    fn from([q1, q2, q1dot, q2dot]: [f64; 4]) -> Self {
        Self::new(q1, q2, q1dot, q2dot)
    }
}

impl From<WalkerState> for [f64; 4] {
    fn from(state: WalkerState) -> Self {
        state.to_array()
    }
}

/// Time derivative of a [`WalkerState`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateDerivative {
    pub q1dot: f64,
    pub q2dot: f64,
    pub q1ddot: f64,
    pub q2ddot: f64,
}

impl StateDerivative {
    pub fn to_array(self) -> [f64; 4] {
        [self.q1dot, self.q2dot, self.q1ddot, self.q2ddot]
    }
}

impl From<StateDerivative> for [f64; 4] {
    fn from(derivative: StateDerivative) -> Self {
        derivative.to_array()
    }
}
