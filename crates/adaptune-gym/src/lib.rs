//! # Gym
//!
//! Episode driver for Adaptune: runs a step-based environment under a policy
//! backed by a [`ControllerManager`](adaptune_darwinian::ControllerManager),
//! reports rewards, and learns on a fixed episode cadence.
//!
//! ## Episode Flow
//!
//! ```text
//! seed -> reset -> (act -> step)* -> reward -> monitor
//!                                        \-> every `episode_learn`: process, reflect, explore, decay
//! ```

pub mod config;
pub mod driver;
pub mod environment;
pub mod seed;
pub mod sim;

pub use config::{AdaptuneConfig, ExplorationSettings};
pub use driver::{ControllerSnapshot, EpisodeOutcome, Trainer, TrainingReport};
pub use environment::{Environment, Policy, Step};
pub use seed::SeedSequence;
pub use sim::{PointMass, TrackingPolicy};
