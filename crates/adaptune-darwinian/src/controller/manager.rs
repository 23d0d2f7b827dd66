//! Round-robin manager over improving controllers
//!
//! Exactly one controller is active. The manager is itself a [`Learner`]: it
//! forwards rewards, reflects and explores to the active controller, and every
//! `rotate_every` reflects hands the turn to the next controller.

use adaptune_common::{ManagerError, Result};
use tracing::info;

use super::{ImprovingController, Learner, Verdict};
use crate::exploration::Tuning;
use crate::mutation::Sampler;
use crate::DEFAULT_ROTATE_EVERY;

#[derive(Debug)]
pub struct ControllerManager {
    controllers: Vec<ImprovingController>,
    selected: usize,
    count: u64,
    rotate_every: u64,
    rotated: bool,
}

impl ControllerManager {
    /// Create a manager rotating every `rotate_every` reflects (at least one)
    pub fn new(rotate_every: u64) -> Self {
        Self {
            controllers: Vec::new(),
            selected: 0,
            count: 0,
            rotate_every: rotate_every.max(1),
            rotated: false,
        }
    }

    /// Append a controller; the first one added becomes active
    pub fn add_controller(&mut self, controller: ImprovingController) {
        if self.controllers.is_empty() {
            self.selected = 0;
        }
        self.controllers.push(controller);
    }

    /// Activate the next controller in insertion order, wrapping around
    pub fn next_controller(&mut self) -> Result<&mut ImprovingController> {
        if self.controllers.is_empty() {
            return Err(self.out_of_range(self.selected + 1));
        }
        self.selected = (self.selected + 1) % self.controllers.len();
        Ok(&mut self.controllers[self.selected])
    }

    /// Activate the controller at `index`
    pub fn select_controller(&mut self, index: usize) -> Result<&mut ImprovingController> {
        if index >= self.controllers.len() {
            return Err(self.out_of_range(index));
        }
        self.selected = index;
        Ok(&mut self.controllers[index])
    }

    pub fn selected(&self) -> Result<&ImprovingController> {
        self.controllers
            .get(self.selected)
            .ok_or_else(|| self.out_of_range(self.selected))
    }

    pub fn selected_mut(&mut self) -> Result<&mut ImprovingController> {
        let len = self.controllers.len();
        let index = self.selected;
        self.controllers
            .get_mut(index)
            .ok_or(ManagerError::OutOfRange { index, len }.into())
    }

    /// Index of the active controller, if any
    pub fn selected_index(&self) -> Option<usize> {
        (!self.controllers.is_empty()).then_some(self.selected)
    }

    pub fn controller(&self, index: usize) -> Option<&ImprovingController> {
        self.controllers.get(index)
    }

    pub fn controller_mut(&mut self, index: usize) -> Option<&mut ImprovingController> {
        self.controllers.get_mut(index)
    }

    pub fn controllers(&self) -> &[ImprovingController] {
        &self.controllers
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Reflects performed so far
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Whether the most recent reflect rotated the active controller
    pub fn rotated(&self) -> bool {
        self.rotated
    }

    pub fn rotate_every(&self) -> u64 {
        self.rotate_every
    }

    fn out_of_range(&self, index: usize) -> adaptune_common::AdaptuneError {
        ManagerError::OutOfRange {
            index,
            len: self.controllers.len(),
        }
        .into()
    }
}

impl Default for ControllerManager {
    fn default() -> Self {
        Self::new(DEFAULT_ROTATE_EVERY)
    }
}

impl Learner for ControllerManager {
    fn name(&self) -> &str {
        self.controllers
            .get(self.selected)
            .map(|controller| controller.name())
            .unwrap_or("")
    }

    fn reward(&mut self, reward: f64) -> Result<()> {
        self.selected_mut()?.reward(reward)
    }

    fn reflect(&mut self) -> Result<Verdict> {
        let verdict = self.selected_mut()?.reflect()?;

        self.count += 1;
        self.rotated = self.count % self.rotate_every == 0;
        if self.rotated {
            let count = self.count;
            let next = self.next_controller()?;
            info!(controller = next.name(), count, "Rotated active controller");
        }
        Ok(verdict)
    }

    fn explore(&mut self, tuning: &Tuning, sampler: &mut dyn Sampler) -> Result<()> {
        self.selected_mut()?.explore(tuning, sampler)
    }

    fn get_string(&self) -> Result<String> {
        self.selected()?.get_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adaptune_common::AdaptuneError;

    fn manager_with(names: &[&str]) -> ControllerManager {
        let mut manager = ControllerManager::default();
        for name in names {
            manager.add_controller(ImprovingController::pid(*name, [0.0, 0.0, 0.0]));
        }
        manager
    }

    fn is_out_of_range(err: &AdaptuneError) -> bool {
        matches!(err, AdaptuneError::Manager(ManagerError::OutOfRange { .. }))
    }

    #[test]
    fn test_next_controller_when_empty() {
        let mut manager = ControllerManager::default();
        let err = manager.next_controller().unwrap_err();
        assert!(is_out_of_range(&err));
    }

    #[test]
    fn test_select_controller_when_empty() {
        let mut manager = ControllerManager::default();
        let err = manager.select_controller(10).unwrap_err();
        assert!(is_out_of_range(&err));
    }

    #[test]
    fn test_select_controller_invalid_index() {
        let mut manager = manager_with(&["A", "B"]);
        assert!(is_out_of_range(&manager.select_controller(2).unwrap_err()));
        assert_eq!(manager.select_controller(1).unwrap().name(), "B");
        assert_eq!(manager.selected_index(), Some(1));
    }

    #[test]
    fn test_add_controller_when_empty() {
        let mut manager = ControllerManager::default();
        assert_eq!(manager.selected_index(), None);
        manager.add_controller(ImprovingController::pid("A", [0.0, 0.0, 0.0]));
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.selected_index(), Some(0));
        assert_eq!(manager.selected().unwrap().name(), "A");
    }

    #[test]
    fn test_next_controller_wraps() {
        let mut manager = manager_with(&["A", "B", "C"]);
        assert_eq!(manager.next_controller().unwrap().name(), "B");
        assert_eq!(manager.next_controller().unwrap().name(), "C");
        assert_eq!(manager.next_controller().unwrap().name(), "A");
    }

    #[test]
    fn test_reflect_is_counting() {
        let mut manager = manager_with(&["A"]);
        assert_eq!(manager.count(), 0);
        manager.reflect().unwrap();
        assert_eq!(manager.count(), 1);
    }

    #[test]
    fn test_reflect_trigger_next() {
        let mut manager = manager_with(&["A", "B"]);
        for _ in 0..9 {
            manager.reflect().unwrap();
            assert!(!manager.rotated());
            assert_eq!(manager.name(), "A");
        }

        manager.reflect().unwrap();
        assert_eq!(manager.count(), 10);
        assert!(manager.rotated());
        assert_eq!(manager.name(), "B");

        manager.reflect().unwrap();
        assert_eq!(manager.count(), 11);
        assert!(!manager.rotated());
        assert_eq!(manager.name(), "B");
    }

    #[test]
    fn test_rotates_once_per_cadence() {
        let mut manager = ControllerManager::new(3);
        manager.add_controller(ImprovingController::pid("A", [0.0, 0.0, 0.0]));
        manager.add_controller(ImprovingController::node("B", [0.0, 0.0, 0.0, 0.0]));

        let rotations = (0..3)
            .map(|_| {
                manager.reflect().unwrap();
                manager.rotated()
            })
            .filter(|rotated| *rotated)
            .count();
        assert_eq!(rotations, 1);
        assert_eq!(manager.selected_index(), Some(1));
    }

    #[test]
    fn test_rewards_go_to_active_controller() {
        let mut manager = manager_with(&["A", "B"]);
        for reward in [1.0, 4.0, 6.0, 7.0, 3.0] {
            manager.reward(reward).unwrap();
        }
        assert_eq!(
            manager.selected().unwrap().current_rewards(),
            &[1.0, 4.0, 6.0, 7.0, 3.0]
        );
        manager.reflect().unwrap();
        assert_eq!(
            manager.controller(0).unwrap().previous_rewards(),
            &[1.0, 4.0, 6.0, 7.0, 3.0]
        );
        assert!(manager.controller(1).unwrap().previous_rewards().is_empty());
    }

    #[test]
    fn test_delegation_on_empty_manager() {
        let mut manager = ControllerManager::default();
        assert!(is_out_of_range(&manager.reward(1.0).unwrap_err()));
        assert!(is_out_of_range(&manager.reflect().unwrap_err()));
        assert!(is_out_of_range(&manager.get_string().unwrap_err()));
        assert_eq!(manager.name(), "");
        assert_eq!(manager.count(), 0);
    }
}
