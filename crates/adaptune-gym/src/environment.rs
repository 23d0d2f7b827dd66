//! Collaborator seams of the episode driver

use adaptune_common::Result;
use adaptune_darwinian::ControllerManager;

/// Outcome of one environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub observation: Vec<f64>,
    pub reward: f64,
    pub done: bool,
}

/// Step-based control environment
pub trait Environment {
    /// Start a new episode from `seed`, returning the first observation
    fn reset(&mut self, seed: u64) -> Result<Vec<f64>>;

    /// Apply one action
    fn step(&mut self, action: f64) -> Result<Step>;

    /// Show the current state
    fn render(&self) {}
}

/// Maps observations to actions through the manager's models
pub trait Policy {
    fn act(&mut self, manager: &mut ControllerManager, observation: &[f64]) -> Result<f64>;

    /// Extra reward added to the environment's reward for this step
    fn shaping(&self, _observation: &[f64]) -> f64 {
        0.0
    }
}
