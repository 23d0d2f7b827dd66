//! # Darwinian
//!
//! Hill-climbing selection engine for Adaptune controllers.
//!
//! ## Selection Rule
//!
//! ```text
//! accept ⇔ Σ current_rewards ≥ Σ previous_rewards
//! ```
//!
//! Where:
//! - current_rewards: episode rewards of the trial configuration
//! - previous_rewards: episode rewards of the last accepted configuration
//!
//! A rejected trial reverts to the accepted configuration. Either way the
//! controller then mutates once and a new trial begins.
//!
//! ## Rotation
//!
//! A [`ControllerManager`] trains several controllers jointly; every
//! `rotate_every` reflects the next controller becomes the one that mutates.

pub mod controller;
pub mod exploration;
pub mod model;
pub mod mutation;

pub use controller::{ControllerManager, ImprovingController, Learner, Verdict};
pub use exploration::Tuning;
pub use model::{Model, NodeModel, PidModel};
pub use mutation::{improvement_gain, mutate, Sampler};

/// Gains of a PID model: proportional, integral, derivative
pub const PID_ARITY: usize = 3;

/// Three input weights and a bias
pub const NODE_ARITY: usize = 4;

/// Reflects between controller rotations
pub const DEFAULT_ROTATE_EVERY: u64 = 10;

/// Darwinian configuration
#[derive(Debug, Clone)]
pub struct DarwinianConfig {
    /// Exploration-probability gate (a directional step needs a draw above it)
    pub epsilon: f64,
    /// Lowest value epsilon decays to
    pub epsilon_floor: f64,
    /// Exploration intensity scaling every mutation step
    pub multiplier: f64,
    /// Lowest value the intensity decays to
    pub multiplier_floor: f64,
    /// Multiplicative decay applied once per learning cadence
    pub decay_rate: f64,
    /// Scale of directional steps
    pub improve_multiplier: f64,
    /// Scale of random fallback steps
    pub random_multiplier: f64,
    /// Reflects between controller rotations
    pub rotate_every: u64,
}

impl DarwinianConfig {
    /// Per-cadence decay rate that applies `discount` ten times over a run of
    /// `episode_cap` episodes learning every `learn_every` episodes
    pub fn decay_rate_for(discount: f64, episode_cap: u64, learn_every: u64) -> f64 {
        if episode_cap == 0 {
            return 1.0;
        }
        discount.powf(10.0 * learn_every as f64 / episode_cap as f64)
    }
}

impl Default for DarwinianConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.9,
            epsilon_floor: 0.05,
            multiplier: 10.0,
            multiplier_floor: 1.0,
            decay_rate: Self::decay_rate_for(0.95, 10_000, 20),
            improve_multiplier: 0.8,
            random_multiplier: 0.1,
            rotate_every: DEFAULT_ROTATE_EVERY,
        }
    }
}
