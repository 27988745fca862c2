//! Equations of motion for the two-link point-foot walker.
//!
//! Both legs have length `L`, the hip carries the point mass `M` and the
//! stance foot carries `Mp`. With `d = q1 - q2` the angular accelerations are
//! closed-form; no linear solve happens per call.
//!
//! Denominators vanish at `cos(2d) = (M + 2Mp) / M` and at
//! `cos(d)^2 = (M + Mp) / M`. Those configurations are returned as whatever
//! IEEE division gives (inf or NaN).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WalkerError;
use crate::params::WalkerParams;
use crate::state::{StateDerivative, WalkerState};

/// Which set of equations drives the single-support phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Formulation {
    /// Gravity-driven passive walker.
    #[default]
    Passive,
    /// Hip torque `K * sin(0.9 * d)` in place of the gravitational terms.
    Actuated,
}

impl Formulation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passive => "passive",
            Self::Actuated => "actuated",
        }
    }
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Formulation {
    type Err = WalkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passive" => Ok(Self::Passive),
            "actuated" => Ok(Self::Actuated),
            _ => Err(WalkerError::InvalidFormulation(s.to_string())),
        }
    }
}

/// Passive angular accelerations `(q1ddot, q2ddot)`.
pub fn passive_accelerations(state: &WalkerState, params: &WalkerParams) -> (f64, f64) {
    let WalkerParams { m, mp, g, l, .. } = *params;
    let WalkerState {
        q1,
        q2,
        q1dot,
        q2dot,
    } = *state;
    let d = q1 - q2;

    let q1ddot = (-(g * ((m + 2.0 * mp) * q1.sin() + m * (q1 - 2.0 * q2).sin()))
        - 2.0 * l * m * q2dot.powi(2) * d.sin()
        + l * m * q1dot.powi(2) * (2.0 * d).sin())
        / (l * (-m - 2.0 * mp + m * (2.0 * d).cos()));

    let q2ddot = (((m + mp) * (-(l * q1dot.powi(2)) + g * q1.cos())
        + l * m * q2dot.powi(2) * d.cos())
        * d.sin())
        / (l * (m + mp - m * d.cos().powi(2)));

    (q1ddot, q2ddot)
}

/// Actuated angular accelerations `(q1ddot, q2ddot)`.
///
/// The hip torque acts with opposite sign on the stance and swing legs.
pub fn actuated_accelerations(state: &WalkerState, params: &WalkerParams) -> (f64, f64) {
    let WalkerParams { k, m, mp, l, .. } = *params;
    let WalkerState {
        q1,
        q2,
        q1dot,
        q2dot,
    } = *state;
    let d = q1 - q2;
    let torque = k * (0.9 * d).sin();

    let q1ddot = (-torque - 2.0 * l * m * q2dot.powi(2) * d.sin()
        + l * m * q1dot.powi(2) * (2.0 * d).sin())
        / (l * (-m - 2.0 * mp + m * (2.0 * d).cos()));

    let q2ddot = (torque
        + (l * m * q2dot.powi(2) * d.cos() - (m + mp) * (l * q1dot.powi(2))) * d.sin())
        / (l * (m + mp - m * d.cos().powi(2)));

    (q1ddot, q2ddot)
}

/// Full state derivative; the velocity half is copied from the input.
pub fn state_derivative(
    state: &WalkerState,
    params: &WalkerParams,
    formulation: Formulation,
) -> StateDerivative {
    let (q1ddot, q2ddot) = match formulation {
        Formulation::Passive => passive_accelerations(state, params),
        Formulation::Actuated => actuated_accelerations(state, params),
    };

    StateDerivative {
        q1dot: state.q1dot,
        q2dot: state.q2dot,
        q1ddot,
        q2ddot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> WalkerParams {
        WalkerParams::new(0.0, 1.0, 0.5, 9.81, 1.0, 0.0, 0.0)
    }

    #[test]
    fn test_upright_legs_together_at_rest() {
        let state = WalkerState::new(0.0, 0.0, 0.0, 0.0);
        let (a1, a2) = passive_accelerations(&state, &params());
        assert_eq!(a1, 0.0);
        assert_eq!(a2, 0.0);
    }

    #[test]
    fn test_stance_leg_falls_forward() {
        // leaning forward, legs apart, at rest: stance leg keeps falling forward
        let state = WalkerState::new(0.2, -0.2, 0.0, 0.0);
        let (a1, _) = passive_accelerations(&state, &params());
        assert!(a1 > 0.0, "q1ddot = {a1}");
    }

    #[test]
    fn test_mirror_symmetry() {
        // mirroring every angle and velocity mirrors the accelerations
        let state = WalkerState::new(0.25, -0.1, 0.7, -1.3);
        let mirrored = WalkerState::new(-0.25, 0.1, -0.7, 1.3);
        let (a1, a2) = passive_accelerations(&state, &params());
        let (b1, b2) = passive_accelerations(&mirrored, &params());
        assert_relative_eq!(a1, -b1, max_relative = 1e-12);
        assert_relative_eq!(a2, -b2, max_relative = 1e-12);
    }

    #[test]
    fn test_actuated_without_torque_matches_passive_without_gravity() {
        let state = WalkerState::new(0.35, -0.15, 0.9, -0.4);
        let actuated = WalkerParams { k: 0.0, ..params() };
        let weightless = WalkerParams { g: 0.0, ..params() };
        let (a1, a2) = actuated_accelerations(&state, &actuated);
        let (p1, p2) = passive_accelerations(&state, &weightless);
        assert_relative_eq!(a1, p1, max_relative = 1e-12);
        assert_relative_eq!(a2, p2, max_relative = 1e-12);
    }

    #[test]
    fn test_actuated_torque_closes_legs() {
        // at rest with legs apart, the hip torque accelerates the legs toward each other
        let state = WalkerState::new(0.2, -0.2, 0.0, 0.0);
        let actuated = WalkerParams { k: 5.0, ..params() };
        let (a1, a2) = actuated_accelerations(&state, &actuated);
        assert!(a1.is_finite() && a2.is_finite());
        assert!(a1 - a2 < 0.0, "a1 = {a1}, a2 = {a2}");
    }

    #[test]
    fn test_state_derivative_copies_velocities() {
        let state = WalkerState::new(0.1, -0.3, 0.123_456_789, -9.876_543_21);
        for formulation in [Formulation::Passive, Formulation::Actuated] {
            let derivative = state_derivative(&state, &params(), formulation);
            assert_eq!(derivative.q1dot.to_bits(), state.q1dot.to_bits());
            assert_eq!(derivative.q2dot.to_bits(), state.q2dot.to_bits());
        }
    }

    #[test]
    fn test_formulation_parse() {
        assert_eq!("passive".parse::<Formulation>().unwrap(), Formulation::Passive);
        assert_eq!(" Actuated ".parse::<Formulation>().unwrap(), Formulation::Actuated);
        assert!(matches!(
            "torque".parse::<Formulation>(),
            Err(WalkerError::InvalidFormulation(_))
        ));
        assert_eq!(Formulation::default(), Formulation::Passive);
    }
}
