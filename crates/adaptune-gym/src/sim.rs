//! Simulated point-mass tracking task
//!
//! A unit mass on a line is pushed by a bounded force towards a target. The
//! observation is `[position, velocity, target]`; every step is rewarded with
//! the negative distance to the target and the episode ends once the mass
//! leaves the track.

use adaptune_common::{AdaptuneError, ManagerError, Result};
use adaptune_darwinian::{ControllerManager, ImprovingController};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::environment::{Environment, Policy, Step};

pub const POSITION: usize = 0;
pub const VELOCITY: usize = 1;
pub const TARGET: usize = 2;

#[derive(Debug, Clone)]
pub struct PointMass {
    /// Half-length of the track
    pub bound: f64,
    pub max_force: f64,
    /// Integration step in seconds
    pub dt: f64,
    /// Fraction of velocity lost per step
    pub friction: f64,
    position: f64,
    velocity: f64,
    target: f64,
    started: bool,
}

impl PointMass {
    pub fn new() -> Self {
        Self {
            bound: 10.0,
            max_force: 10.0,
            dt: 0.05,
            friction: 0.1,
            position: 0.0,
            velocity: 0.0,
            target: 0.0,
            started: false,
        }
    }

    fn observation(&self) -> Vec<f64> {
        vec![self.position, self.velocity, self.target]
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn target(&self) -> f64 {
        self.target
    }
}

impl Default for PointMass {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for PointMass {
    fn reset(&mut self, seed: u64) -> Result<Vec<f64>> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.position = rng.gen_range(-1.0..1.0);
        self.velocity = 0.0;
        self.target = rng.gen_range(-3.0..3.0);
        self.started = true;
        Ok(self.observation())
    }

    fn step(&mut self, action: f64) -> Result<Step> {
        if !self.started {
            return Err(AdaptuneError::Environment(
                "step called before reset".to_string(),
            ));
        }
        if !action.is_finite() {
            return Err(AdaptuneError::Environment(format!(
                "non-finite action {action}"
            )));
        }

        let force = action.clamp(-self.max_force, self.max_force);
        self.velocity = (self.velocity + force * self.dt) * (1.0 - self.friction);
        self.position += self.velocity * self.dt;

        let done = self.position.abs() > self.bound;
        if done {
            self.started = false;
        }
        Ok(Step {
            observation: self.observation(),
            reward: -(self.position - self.target).abs(),
            done,
        })
    }

    fn render(&self) {
        info!(
            position = self.position,
            velocity = self.velocity,
            target = self.target,
            "Point mass"
        );
    }
}

/// Cascade of a node estimator feeding a PID tracker
///
/// The node model turns the observation into a position estimate; the PID
/// model drives that estimate to the target and its output is the force.
#[derive(Debug, Clone)]
pub struct TrackingPolicy {
    pub estimator: usize,
    pub tracker: usize,
    /// Weight of the squared-velocity penalty added to each step reward
    pub velocity_penalty: f64,
}

impl TrackingPolicy {
    pub const ESTIMATOR: &'static str = "ESTIMATOR";
    pub const TRACKER: &'static str = "TRACKER";

    pub fn new() -> Self {
        Self {
            estimator: 0,
            tracker: 1,
            velocity_penalty: 0.0,
        }
    }

    pub fn with_velocity_penalty(mut self, weight: f64) -> Self {
        self.velocity_penalty = weight;
        self
    }

    /// Manager holding the estimator and tracker this policy drives
    pub fn manager(rotate_every: u64) -> ControllerManager {
        let mut manager = ControllerManager::new(rotate_every);
        manager.add_controller(ImprovingController::node(
            Self::ESTIMATOR,
            [1.0, 0.0, 0.0, 0.0],
        ));
        manager.add_controller(ImprovingController::pid(Self::TRACKER, [1.0, 0.0, 0.0]));
        manager
    }
}

impl Default for TrackingPolicy {
    fn default() -> Self {
        Self::new()
    }
}

fn controller(manager: &mut ControllerManager, index: usize) -> Result<&mut ImprovingController> {
    let len = manager.len();
    manager
        .controller_mut(index)
        .ok_or_else(|| ManagerError::OutOfRange { index, len }.into())
}

impl Policy for TrackingPolicy {
    fn act(&mut self, manager: &mut ControllerManager, observation: &[f64]) -> Result<f64> {
        let target = observation.get(TARGET).copied().ok_or_else(|| {
            AdaptuneError::Environment(format!(
                "observation has {} components, target expected at {TARGET}",
                observation.len()
            ))
        })?;

        let estimate = controller(manager, self.estimator)?
            .model_mut()
            .get_output(observation, target)?;
        controller(manager, self.tracker)?
            .model_mut()
            .get_output(&[estimate], target)
    }

    fn shaping(&self, observation: &[f64]) -> f64 {
        let velocity = observation.get(VELOCITY).copied().unwrap_or(0.0);
        -self.velocity_penalty * velocity * velocity
    }
}
