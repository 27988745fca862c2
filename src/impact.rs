//! Heel-strike impact map.
//!
//! The swing foot hits the ground and the collision is treated as
//! instantaneous and perfectly inelastic, conserving angular momentum about
//! the new contact point. The legs swap roles: the returned state starts the
//! next stance phase with the old swing angle in the stance slot.

use crate::params::WalkerParams;
use crate::state::WalkerState;

/// Post-impact angular velocities `(q1dot', q2dot')`.
pub fn post_impact_velocities(state: &WalkerState, params: &WalkerParams) -> (f64, f64) {
    let WalkerParams { m, mp, .. } = *params;
    let d = state.leg_separation();
    let denom = m + 2.0 * mp - m * (2.0 * d).cos();

    let q1dot = (2.0 * mp * state.q1dot * d.cos().powi(2)) / denom;
    let q2dot = (2.0 * mp * state.q1dot * d.cos()) / denom;

    (q1dot, q2dot)
}

/// State right after heel strike, legs relabeled: `(q2, q1, q1dot', q2dot')`.
pub fn impact(state: &WalkerState, params: &WalkerParams) -> WalkerState {
    let (q1dot, q2dot) = post_impact_velocities(state, params);
    WalkerState::new(state.q2, state.q1, q1dot, q2dot)
}
