//! Learning controllers
//!
//! - [`ImprovingController`]: one model under hill-climbing selection
//! - [`ControllerManager`]: round-robin over several improving controllers

pub mod improving;
pub mod manager;

pub use self::improving::ImprovingController;
pub use self::manager::ControllerManager;

use adaptune_common::Result;

use crate::exploration::Tuning;
use crate::mutation::Sampler;

/// Outcome of one reflect
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// First evaluation; the trial became the baseline unconditionally
    Seeded,
    /// The trial scored at least as well as the baseline and replaced it
    Accepted { gain: f64 },
    /// The trial scored worse and was reverted
    Rejected { gain: f64 },
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Verdict::Rejected { .. })
    }

    /// Improvement gain of the trial over the baseline; none for the seeding reflect
    pub fn gain(&self) -> Option<f64> {
        match self {
            Verdict::Seeded => None,
            Verdict::Accepted { gain } | Verdict::Rejected { gain } => Some(*gain),
        }
    }
}

/// Controller that learns from episode rewards
pub trait Learner {
    /// Display name used in reports
    fn name(&self) -> &str;

    /// Report the total reward of a finished episode
    fn reward(&mut self, reward: f64) -> Result<()>;

    /// Accept or reject the trial configuration
    fn reflect(&mut self) -> Result<Verdict>;

    /// Mutate into the next trial configuration
    fn explore(&mut self, tuning: &Tuning, sampler: &mut dyn Sampler) -> Result<()>;

    /// Applied parameters rendered for logs
    fn get_string(&self) -> Result<String>;
}
