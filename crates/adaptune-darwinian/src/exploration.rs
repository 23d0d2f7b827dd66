//! Exploration state shared by every controller of a run
//!
//! Epsilon gates directional steps, the multiplier scales every mutation. Both
//! decay once per learning cadence until they reach their floors.

use serde::Serialize;
use tracing::debug;

use crate::DarwinianConfig;

/// Process-wide exploration tuning
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tuning {
    /// Exploration-probability gate
    pub epsilon: f64,
    pub epsilon_floor: f64,
    /// Exploration intensity
    pub multiplier: f64,
    pub multiplier_floor: f64,
    pub decay_rate: f64,
    pub improve_multiplier: f64,
    pub random_multiplier: f64,
}

impl Tuning {
    pub fn new(config: &DarwinianConfig) -> Self {
        Self {
            epsilon: config.epsilon,
            epsilon_floor: config.epsilon_floor,
            multiplier: config.multiplier,
            multiplier_floor: config.multiplier_floor,
            decay_rate: config.decay_rate,
            improve_multiplier: config.improve_multiplier,
            random_multiplier: config.random_multiplier,
        }
    }

    /// Apply one decay step; returns false once both values sit at their floors
    pub fn decay(&mut self) -> bool {
        let mut decayed = false;
        if self.multiplier > self.multiplier_floor {
            self.multiplier = (self.multiplier * self.decay_rate).max(self.multiplier_floor);
            decayed = true;
        }
        if self.epsilon > self.epsilon_floor {
            self.epsilon = (self.epsilon * self.decay_rate).max(self.epsilon_floor);
            decayed = true;
        }
        if decayed {
            debug!(
                epsilon = self.epsilon,
                multiplier = self.multiplier,
                "Decayed exploration"
            );
        }
        decayed
    }

    /// True once neither value can decay further
    pub fn settled(&self) -> bool {
        self.multiplier <= self.multiplier_floor && self.epsilon <= self.epsilon_floor
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::new(&DarwinianConfig::default())
    }
}
