//! Training run configuration

use std::path::PathBuf;
use std::str::FromStr;

use adaptune_common::{AdaptuneError, Result};
use adaptune_darwinian::{DarwinianConfig, DEFAULT_ROTATE_EVERY};
use adaptune_metering::DEFAULT_KEY_METRIC;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::driver::RECORDED_METRICS;

/// Training run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptuneConfig {
    /// Episodes to run
    pub episode_cap: u64,
    /// Render and print report tables every this many episodes
    pub episode_show: u64,
    /// Log episode lengths every this many episodes
    pub episode_print: u64,
    /// Learn (process, reflect, explore, decay) every this many episodes
    pub episode_learn: u64,
    /// Step limit per episode
    pub time_steps: u64,
    pub exploration: ExplorationSettings,
    /// Reflects between controller rotations
    pub rotate_every: u64,
    /// Master seed; entropy when unset
    pub seed: Option<u64>,
    /// Metric the monitor windows are keyed on
    pub key_metric: String,
    /// Where the binary writes the JSON training report
    pub report_path: Option<PathBuf>,
}

impl Default for AdaptuneConfig {
    fn default() -> Self {
        Self {
            episode_cap: 10_000,
            episode_show: 1_000,
            episode_print: 100,
            episode_learn: 20,
            time_steps: 200,
            exploration: ExplorationSettings::default(),
            rotate_every: DEFAULT_ROTATE_EVERY,
            seed: None,
            key_metric: DEFAULT_KEY_METRIC.to_string(),
            report_path: None,
        }
    }
}

/// Exploration schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorationSettings {
    pub epsilon: f64,
    pub epsilon_floor: f64,
    /// Applied ten times over the whole run
    pub discount: f64,
    pub multiplier: f64,
    pub multiplier_floor: f64,
    pub improve_multiplier: f64,
    pub random_multiplier: f64,
}

impl Default for ExplorationSettings {
    fn default() -> Self {
        let defaults = DarwinianConfig::default();
        Self {
            epsilon: defaults.epsilon,
            epsilon_floor: defaults.epsilon_floor,
            discount: 0.95,
            multiplier: defaults.multiplier,
            multiplier_floor: defaults.multiplier_floor,
            improve_multiplier: defaults.improve_multiplier,
            random_multiplier: defaults.random_multiplier,
        }
    }
}

/// Overwrite `slot` when `key` is set; unparsable values keep the current one
fn apply<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *slot = value,
            Err(_) => warn!(key, value = %raw, "Ignoring unparsable configuration value"),
        }
    }
}

impl AdaptuneConfig {
    /// Load configuration from `.env` and `ADAPTUNE_*` environment variables
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let cfg = Self::from_lookup(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by whatever `lookup` resolves
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        apply(&lookup, "ADAPTUNE_EPISODE_CAP", &mut cfg.episode_cap);
        apply(&lookup, "ADAPTUNE_EPISODE_SHOW", &mut cfg.episode_show);
        apply(&lookup, "ADAPTUNE_EPISODE_PRINT", &mut cfg.episode_print);
        apply(&lookup, "ADAPTUNE_EPISODE_LEARN", &mut cfg.episode_learn);
        apply(&lookup, "ADAPTUNE_TIME_STEPS", &mut cfg.time_steps);
        apply(&lookup, "ADAPTUNE_ROTATE_EVERY", &mut cfg.rotate_every);
        apply(&lookup, "ADAPTUNE_KEY_METRIC", &mut cfg.key_metric);

        if let Some(raw) = lookup("ADAPTUNE_SEED") {
            match raw.trim().parse::<u64>() {
                Ok(seed) => cfg.seed = Some(seed),
                Err(_) => warn!(key = "ADAPTUNE_SEED", value = %raw, "Ignoring unparsable configuration value"),
            }
        }

        if let Some(path) = lookup("ADAPTUNE_REPORT_PATH").filter(|p| !p.trim().is_empty()) {
            cfg.report_path = Some(PathBuf::from(path.trim()));
        }

        // Exploration settings
        let exploration = &mut cfg.exploration;
        apply(&lookup, "ADAPTUNE_EPSILON", &mut exploration.epsilon);
        apply(&lookup, "ADAPTUNE_EPSILON_FLOOR", &mut exploration.epsilon_floor);
        apply(&lookup, "ADAPTUNE_DISCOUNT", &mut exploration.discount);
        apply(&lookup, "ADAPTUNE_MULTIPLIER", &mut exploration.multiplier);
        apply(&lookup, "ADAPTUNE_MULTIPLIER_FLOOR", &mut exploration.multiplier_floor);
        apply(&lookup, "ADAPTUNE_IMPROVE_MULTIPLIER", &mut exploration.improve_multiplier);
        apply(&lookup, "ADAPTUNE_RANDOM_MULTIPLIER", &mut exploration.random_multiplier);

        cfg
    }

    /// Reject settings the driver cannot run with
    pub fn validate(&self) -> Result<()> {
        let cadences = [
            ("episode_show", self.episode_show),
            ("episode_print", self.episode_print),
            ("episode_learn", self.episode_learn),
            ("time_steps", self.time_steps),
            ("rotate_every", self.rotate_every),
        ];
        for (name, value) in cadences {
            if value == 0 {
                return Err(AdaptuneError::Config(format!("{name} must be at least 1")));
            }
        }

        let exploration = &self.exploration;
        let positive = [
            ("multiplier", exploration.multiplier),
            ("multiplier_floor", exploration.multiplier_floor),
            ("improve_multiplier", exploration.improve_multiplier),
            ("random_multiplier", exploration.random_multiplier),
            ("discount", exploration.discount),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(AdaptuneError::Config(format!("{name} must be positive, got {value}")));
            }
        }
        if !(0.0..=1.0).contains(&exploration.epsilon) {
            return Err(AdaptuneError::Config(format!(
                "epsilon must lie in [0, 1], got {}",
                exploration.epsilon
            )));
        }
        if !RECORDED_METRICS.contains(&self.key_metric.as_str()) {
            return Err(AdaptuneError::Config(format!(
                "key_metric must be one of {RECORDED_METRICS:?}, got {:?}",
                self.key_metric
            )));
        }
        Ok(())
    }

    /// Darwinian settings with the decay rate derived from the run length
    pub fn darwinian(&self) -> DarwinianConfig {
        let exploration = &self.exploration;
        DarwinianConfig {
            epsilon: exploration.epsilon,
            epsilon_floor: exploration.epsilon_floor,
            multiplier: exploration.multiplier,
            multiplier_floor: exploration.multiplier_floor,
            decay_rate: DarwinianConfig::decay_rate_for(
                exploration.discount,
                self.episode_cap,
                self.episode_learn,
            ),
            improve_multiplier: exploration.improve_multiplier,
            random_multiplier: exploration.random_multiplier,
            rotate_every: self.rotate_every,
        }
    }
}
