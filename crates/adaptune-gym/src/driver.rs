//! Episode driver
//!
//! Runs episodes against an [`Environment`], feeds each episode reward to the
//! controller manager and the monitor, and on the learning cadence processes
//! the monitor window, reflects, explores and decays the exploration tuning.

use std::sync::atomic::{AtomicBool, Ordering};

use adaptune_common::{ParameterVector, Result};
use adaptune_darwinian::{ControllerManager, Learner, Tuning, Verdict};
use adaptune_metering::{
    EpisodeMonitor, MetricRecord, StatisticsResult, DEFAULT_INDEX_METRIC, DEFAULT_KEY_METRIC,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::AdaptuneConfig;
use crate::environment::{Environment, Policy};
use crate::seed::SeedSequence;

/// Total episode reward
pub const REWARD_METRIC: &str = DEFAULT_KEY_METRIC;

/// Steps the episode lasted
pub const STEPS_METRIC: &str = "steps";

/// Metrics recorded for every episode; the monitor can only be keyed on these
pub const RECORDED_METRICS: [&str; 3] = [REWARD_METRIC, STEPS_METRIC, DEFAULT_INDEX_METRIC];

/// Totals of one finished episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeOutcome {
    pub episode: u64,
    /// Environment reward plus shaping reward, summed over the episode
    pub reward: f64,
    pub steps: u64,
}

/// Applied parameters of one controller at the end of a run
#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    pub name: String,
    pub parameters: ParameterVector,
}

/// Summary of a training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub episodes: u64,
    /// Stopped before the episode cap
    pub interrupted: bool,
    pub controllers: Vec<ControllerSnapshot>,
    /// Exploration state after the last decay
    pub tuning: Tuning,
    pub results: Vec<StatisticsResult>,
}

pub struct Trainer<E, P> {
    config: AdaptuneConfig,
    environment: E,
    policy: P,
    manager: ControllerManager,
    monitor: EpisodeMonitor,
    tuning: Tuning,
    seeds: SeedSequence,
    rng: StdRng,
    episode: u64,
}

impl<E: Environment, P: Policy> Trainer<E, P> {
    pub fn new(
        config: AdaptuneConfig,
        environment: E,
        policy: P,
        manager: ControllerManager,
    ) -> Result<Self> {
        config.validate()?;

        let seeds = config.seed.map(SeedSequence::new).unwrap_or_default();
        let rng = StdRng::seed_from_u64(seeds.master_seed().wrapping_add(1));
        let monitor = EpisodeMonitor::new(config.key_metric.clone(), DEFAULT_INDEX_METRIC);
        let tuning = Tuning::new(&config.darwinian());

        info!(
            master_seed = seeds.master_seed(),
            controllers = manager.len(),
            episode_cap = config.episode_cap,
            "Trainer ready"
        );

        Ok(Self {
            config,
            environment,
            policy,
            manager,
            monitor,
            tuning,
            seeds,
            rng,
            episode: 0,
        })
    }

    /// Play one episode with the applied parameters
    pub fn run_episode(&mut self) -> Result<EpisodeOutcome> {
        self.episode += 1;
        let episode = self.episode;
        let show = episode % self.config.episode_show == 0;

        for index in 0..self.manager.len() {
            if let Some(controller) = self.manager.controller_mut(index) {
                controller.model_mut().reset();
            }
        }

        let seed = self.seeds.next_seed();
        let mut observation = self.environment.reset(seed)?;
        let mut reward = 0.0;
        let mut steps = 0;

        while steps < self.config.time_steps {
            if show {
                self.environment.render();
            }
            let action = self.policy.act(&mut self.manager, &observation)?;
            let step = self.environment.step(action)?;
            steps += 1;
            reward += step.reward + self.policy.shaping(&step.observation);
            observation = step.observation;
            if step.done {
                break;
            }
        }

        if show || episode % self.config.episode_print == 0 {
            info!(episode, steps, reward, seed, "Episode finished");
        }

        Ok(EpisodeOutcome {
            episode,
            reward,
            steps,
        })
    }

    /// Report a finished episode; returns the verdict on learning episodes
    #[instrument(skip(self), fields(episode = outcome.episode))]
    pub fn end_episode(&mut self, outcome: &EpisodeOutcome) -> Result<Option<Verdict>> {
        self.manager.reward(outcome.reward)?;
        self.monitor.monitor(
            MetricRecord::new()
                .with(REWARD_METRIC, outcome.reward)
                .with(STEPS_METRIC, outcome.steps as f64)
                .with(DEFAULT_INDEX_METRIC, outcome.episode as f64),
        );

        let mut verdict = None;
        if outcome.episode % self.config.episode_learn == 0 {
            self.monitor.process(
                self.config.episode_learn as usize,
                self.tuning.epsilon,
                self.tuning.multiplier,
            )?;
            verdict = Some(self.manager.reflect()?);
            self.manager.explore(&self.tuning, &mut self.rng)?;
            self.tuning.decay();
        }

        if outcome.episode % self.config.episode_show == 0 && self.monitor.latest().is_some() {
            info!("{}", self.monitor.get_log()?);
            info!(
                controller = self.manager.name(),
                parameters = %self.manager.get_string()?,
                "Active controller"
            );
        }

        Ok(verdict)
    }

    /// Train until the episode cap or until `stop` is raised between episodes
    #[instrument(skip_all)]
    pub fn run(&mut self, stop: &AtomicBool) -> Result<TrainingReport> {
        while self.episode < self.config.episode_cap {
            if stop.load(Ordering::Relaxed) {
                info!(episode = self.episode, "Stop requested");
                break;
            }
            let outcome = self.run_episode()?;
            self.end_episode(&outcome)?;
        }
        Ok(self.report())
    }

    pub fn report(&self) -> TrainingReport {
        TrainingReport {
            episodes: self.episode,
            interrupted: self.episode < self.config.episode_cap,
            controllers: self
                .manager
                .controllers()
                .iter()
                .map(|controller| ControllerSnapshot {
                    name: controller.name().to_string(),
                    parameters: controller.model().get_model(),
                })
                .collect(),
            tuning: self.tuning.clone(),
            results: self.monitor.results().to_vec(),
        }
    }

    pub fn manager(&self) -> &ControllerManager {
        &self.manager
    }

    pub fn monitor(&self) -> &EpisodeMonitor {
        &self.monitor
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn seeds(&self) -> &SeedSequence {
        &self.seeds
    }

    /// Episodes played so far
    pub fn episode(&self) -> u64 {
        self.episode
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }
}
