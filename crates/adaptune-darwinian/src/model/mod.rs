//! Control models
//!
//! A model maps an observation window and a setpoint to one scalar output.
//! Its coefficients are exposed as a [`ParameterVector`] so the optimizer can
//! read, mutate and re-apply them.

pub mod node;
pub mod pid;

pub use self::node::NodeModel;
pub use self::pid::PidModel;

use adaptune_common::{ParameterVector, Result};
use std::fmt;

/// Parametrized feedback-control model
pub trait Model: fmt::Debug + Send {
    /// Number of coefficients `set_model` accepts
    fn arity(&self) -> usize;

    /// Compute the control output for one step
    fn get_output(&mut self, observation: &[f64], setpoint: f64) -> Result<f64>;

    /// Applied coefficients, in order
    fn get_model(&self) -> ParameterVector;

    /// Replace the applied coefficients; fails on an arity mismatch
    fn set_model(&mut self, parameters: &ParameterVector) -> Result<()>;

    /// Clear per-episode state, keeping the coefficients
    fn reset(&mut self);

    /// Output of the most recent `get_output` call
    fn output(&self) -> f64;
}
