//! Point-foot passive walker dynamics
//!
//! Closed-form equations of motion and heel-strike impact map for a 2D
//! two-link walker with a point mass at the hip and point masses at the feet.
//! The crate is the evaluator half of a walking simulation: an external ODE
//! solver integrates the derivative output and applies the impact output when
//! its own event detector reports swing-foot contact.

pub mod batch;
pub mod dynamics;
pub mod error;
pub mod evaluator;
pub mod impact;
pub mod params;
pub mod state;

// Re-export main types
pub use batch::{evaluate_csv, BatchSummary};
pub use dynamics::Formulation;
pub use error::{WalkerError, WalkerResult};
pub use evaluator::{evaluate, is_degenerate, DynamicsEvaluator, Mode};
pub use params::WalkerParams;
pub use state::{StateDerivative, WalkerState};
