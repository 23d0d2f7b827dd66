//! Improving controller: hill climbing over one model's parameters
//!
//! Rewards of the running trial accumulate in `current_rewards`. On reflect the
//! trial total is compared with the baseline total; ties keep the newer
//! configuration. Reflect always ends with an empty `current_rewards` and the
//! surviving configuration applied to the model.

use adaptune_common::{ParameterVector, Result};
use tracing::debug;

use super::{Learner, Verdict};
use crate::exploration::Tuning;
use crate::model::{Model, NodeModel, PidModel};
use crate::mutation::{improvement_gain, mutate, Sampler};

/// Model under hill-climbing selection
#[derive(Debug)]
pub struct ImprovingController {
    name: String,
    model: Box<dyn Model>,
    current: ParameterVector,
    previous: ParameterVector,
    current_rewards: Vec<f64>,
    previous_rewards: Vec<f64>,
}

impl ImprovingController {
    /// Wrap a model; its applied parameters seed both configurations
    pub fn new(name: impl Into<String>, model: Box<dyn Model>) -> Self {
        let parameters = model.get_model();
        Self {
            name: name.into(),
            model,
            current: parameters.clone(),
            previous: parameters,
            current_rewards: Vec::new(),
            previous_rewards: Vec::new(),
        }
    }

    /// Controller over a PID model
    pub fn pid(name: impl Into<String>, gains: [f64; crate::PID_ARITY]) -> Self {
        Self::new(name, Box::new(PidModel::new(gains)))
    }

    /// Controller over a node model
    pub fn node(name: impl Into<String>, parameters: [f64; crate::NODE_ARITY]) -> Self {
        Self::new(name, Box::new(NodeModel::new(parameters)))
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> &mut dyn Model {
        self.model.as_mut()
    }

    /// Trial configuration
    pub fn current_parameters(&self) -> &ParameterVector {
        &self.current
    }

    /// Last accepted configuration
    pub fn previous_parameters(&self) -> &ParameterVector {
        &self.previous
    }

    pub fn current_rewards(&self) -> &[f64] {
        &self.current_rewards
    }

    pub fn previous_rewards(&self) -> &[f64] {
        &self.previous_rewards
    }

    /// Replace the trial configuration and apply it to the model
    pub fn propose(&mut self, parameters: ParameterVector) -> Result<()> {
        self.model.set_model(&parameters)?;
        self.current = parameters;
        Ok(())
    }

    fn accept(&mut self) {
        self.previous_rewards = self.current_rewards.clone();
        self.previous = self.current.clone();
    }
}

impl Learner for ImprovingController {
    fn name(&self) -> &str {
        &self.name
    }

    fn reward(&mut self, reward: f64) -> Result<()> {
        self.model.reset();
        self.current_rewards.push(reward);
        Ok(())
    }

    fn reflect(&mut self) -> Result<Verdict> {
        let verdict = if self.previous_rewards.is_empty() {
            self.accept();
            Verdict::Seeded
        } else {
            let total: f64 = self.current_rewards.iter().sum();
            let baseline: f64 = self.previous_rewards.iter().sum();
            let gain = improvement_gain(total, baseline);
            if total >= baseline {
                self.accept();
                Verdict::Accepted { gain }
            } else {
                self.current = self.previous.clone();
                Verdict::Rejected { gain }
            }
        };

        self.current_rewards.clear();
        self.model.set_model(&self.current)?;

        debug!(
            controller = %self.name,
            accepted = verdict.is_accepted(),
            gain = ?verdict.gain(),
            parameters = %self.current,
            "Reflected"
        );
        Ok(verdict)
    }

    fn explore(&mut self, tuning: &Tuning, sampler: &mut dyn Sampler) -> Result<()> {
        let next = mutate(&self.current, &self.previous, tuning, sampler);
        debug!(controller = %self.name, from = %self.current, to = %next, "Explored");
        self.propose(next)
    }

    fn get_string(&self) -> Result<String> {
        Ok(self.model.get_model().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::sampler::testing::FixedSampler;
    use adaptune_common::{AdaptuneError, ModelError};

    fn node_controller() -> ImprovingController {
        ImprovingController::node("TEST", [0.0, 0.0, 0.0, 0.0])
    }

    fn feed(controller: &mut ImprovingController, rewards: &[f64]) {
        for reward in rewards {
            controller.reward(*reward).unwrap();
        }
    }

    #[test]
    fn test_reward_being_added_to_current_reward() {
        let mut controller = node_controller();
        feed(&mut controller, &[1.0, 4.0, 6.0, 7.0, 3.0]);
        assert_eq!(controller.current_rewards(), &[1.0, 4.0, 6.0, 7.0, 3.0]);
        assert!(controller.previous_rewards().is_empty());
    }

    #[test]
    fn test_reflect_moves_current_to_previous() {
        let mut controller = node_controller();
        feed(&mut controller, &[1.0, 4.0, 6.0, 7.0, 3.0]);
        assert_eq!(controller.reflect().unwrap(), Verdict::Seeded);
        assert!(controller.current_rewards().is_empty());
        assert_eq!(controller.previous_rewards(), &[1.0, 4.0, 6.0, 7.0, 3.0]);
    }

    #[test]
    fn test_reward_after_reflect() {
        let mut controller = node_controller();
        feed(&mut controller, &[1.0, 4.0, 6.0, 7.0, 3.0]);
        controller.reflect().unwrap();
        feed(&mut controller, &[5.0, 7.0, 9.0, 3.0, 1.0]);
        assert_eq!(controller.current_rewards(), &[5.0, 7.0, 9.0, 3.0, 1.0]);
        assert_eq!(controller.previous_rewards(), &[1.0, 4.0, 6.0, 7.0, 3.0]);
    }

    #[test]
    fn test_reflect_higher_reward_at_second_reflect() {
        let mut controller = node_controller();
        feed(&mut controller, &[1.0, 4.0, 6.0, 7.0, 3.0]); // 21
        controller.reflect().unwrap();
        feed(&mut controller, &[5.0, 7.0, 9.0, 3.0, 1.0]); // 25
        let verdict = controller.reflect().unwrap();

        assert!(verdict.is_accepted());
        assert!(controller.current_rewards().is_empty());
        assert_eq!(controller.previous_rewards(), &[5.0, 7.0, 9.0, 3.0, 1.0]);
    }

    #[test]
    fn test_reflect_lower_reward_at_second_reflect() {
        let mut controller = node_controller();
        feed(&mut controller, &[5.0, 7.0, 9.0, 3.0, 1.0]); // 25
        controller.reflect().unwrap();
        feed(&mut controller, &[1.0, 4.0, 6.0, 7.0, 3.0]); // 21
        let verdict = controller.reflect().unwrap();

        assert!(matches!(verdict, Verdict::Rejected { gain } if gain < 1.0));
        assert!(controller.current_rewards().is_empty());
        assert_eq!(controller.previous_rewards(), &[5.0, 7.0, 9.0, 3.0, 1.0]);
    }

    #[test]
    fn test_reflect_tie_keeps_newer_configuration() {
        let mut controller = node_controller();
        feed(&mut controller, &[3.0]);
        controller.reflect().unwrap();
        let proposal = ParameterVector::from([1.0, 1.0, 1.0, 1.0]);
        controller.propose(proposal.clone()).unwrap();
        feed(&mut controller, &[1.0, 2.0]);
        assert_eq!(
            controller.reflect().unwrap(),
            Verdict::Accepted { gain: 1.0 }
        );
        assert_eq!(controller.previous_parameters(), &proposal);
    }

    #[test]
    fn test_reflect_first_run_accepts_proposal() {
        let mut controller = node_controller();
        let proposal = ParameterVector::from([1.0, 2.0, 3.0, 4.0]);
        controller.propose(proposal.clone()).unwrap();
        assert_eq!(controller.previous_parameters(), &ParameterVector::zeros(4));

        controller.reflect().unwrap();
        assert_eq!(controller.current_parameters(), &proposal);
        assert_eq!(controller.previous_parameters(), &proposal);
    }

    #[test]
    fn test_reflect_reverts_worse_configuration() {
        let mut controller = node_controller();
        feed(&mut controller, &[10.0]);
        controller.reflect().unwrap();

        controller
            .propose(ParameterVector::from([1.0, 2.0, 3.0, 4.0]))
            .unwrap();
        feed(&mut controller, &[-1.0]);
        controller.reflect().unwrap();

        assert_eq!(controller.current_parameters(), &ParameterVector::zeros(4));
        assert_eq!(controller.previous_parameters(), &ParameterVector::zeros(4));
        assert_eq!(controller.model().get_model(), ParameterVector::zeros(4));
    }

    #[test]
    fn test_reflect_keeps_better_configuration() {
        let mut controller = node_controller();
        feed(&mut controller, &[10.0]);
        controller.reflect().unwrap();

        let proposal = ParameterVector::from([1.0, 2.0, 3.0, 4.0]);
        controller.propose(proposal.clone()).unwrap();
        feed(&mut controller, &[100.0]);
        assert_eq!(
            controller.reflect().unwrap(),
            Verdict::Accepted { gain: 10.0 }
        );

        assert_eq!(controller.current_parameters(), &proposal);
        assert_eq!(controller.previous_parameters(), &proposal);
    }

    #[test]
    fn test_verdict_carries_gain() {
        let mut controller = node_controller();
        feed(&mut controller, &[10.0]);
        assert_eq!(controller.reflect().unwrap().gain(), None);

        feed(&mut controller, &[20.0]);
        assert_eq!(controller.reflect().unwrap().gain(), Some(2.0));

        feed(&mut controller, &[5.0]);
        let verdict = controller.reflect().unwrap();
        assert!(!verdict.is_accepted());
        assert_eq!(verdict.gain(), Some(0.25));
    }

    #[test]
    fn test_reward_resets_model_state() {
        let mut controller = ImprovingController::pid("PID", [1.0, 1.0, 1.0]);
        controller.model_mut().get_output(&[0.0], 5.0).unwrap();
        assert_ne!(controller.model().output(), 0.0);
        controller.reward(1.0).unwrap();
        assert_eq!(controller.model().output(), 0.0);
    }

    #[test]
    fn test_explore_applies_mutation_to_model() {
        let mut controller = ImprovingController::pid("PID", [10.0, 0.1, 2.0]);
        let tuning = Tuning::default();
        controller.explore(&tuning, &mut FixedSampler(0.0)).unwrap();

        assert_ne!(controller.current_parameters(), controller.previous_parameters());
        assert_eq!(
            &controller.model().get_model(),
            controller.current_parameters()
        );
    }

    #[test]
    fn test_propose_wrong_arity() {
        let mut controller = ImprovingController::pid("PID", [10.0, 0.1, 2.0]);
        let err = controller
            .propose(ParameterVector::from([1.0, 2.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            AdaptuneError::Model(ModelError::ArityMismatch { .. })
        ));
        assert_eq!(
            controller.current_parameters(),
            &ParameterVector::from([10.0, 0.1, 2.0])
        );
    }

    #[test]
    fn test_get_string() {
        let controller = ImprovingController::pid("PID", [10.0, 0.1, 2.0]);
        assert_eq!(controller.get_string().unwrap(), "(10, 0.1, 2)");

        let controller = ImprovingController::node("NODE", [0.5, 0.1, 2.0, 0.0]);
        assert_eq!(controller.get_string().unwrap(), "(0.5, 0.1, 2, 0)");
        assert_eq!(controller.name(), "NODE");
    }
}
