//! Weighted-node model: weighted sum of the observation plus a bias

use adaptune_common::{ModelError, ParameterVector, Result};

use super::Model;
use crate::NODE_ARITY;

const INPUTS: usize = NODE_ARITY - 1;

/// Single linear node over a three-component observation
///
/// Has no temporal state; the setpoint is ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeModel {
    weights: [f64; INPUTS],
    bias: f64,
    output: f64,
}

impl NodeModel {
    /// Create from three weights followed by a bias
    pub fn new(parameters: [f64; NODE_ARITY]) -> Self {
        let [w0, w1, w2, bias] = parameters;
        Self {
            weights: [w0, w1, w2],
            bias,
            output: 0.0,
        }
    }

    /// Build from a parameter vector of arity 4
    pub fn from_parameters(parameters: &ParameterVector) -> Result<Self> {
        let mut model = Self::new([0.0; NODE_ARITY]);
        model.set_model(parameters)?;
        Ok(model)
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }
}

impl Model for NodeModel {
    fn arity(&self) -> usize {
        NODE_ARITY
    }

    fn get_output(&mut self, observation: &[f64], _setpoint: f64) -> Result<f64> {
        if observation.len() < INPUTS {
            return Err(ModelError::MissingInput {
                index: INPUTS - 1,
                len: observation.len(),
            }
            .into());
        }

        let weighted: f64 = self
            .weights
            .iter()
            .zip(observation)
            .map(|(weight, input)| weight * input)
            .sum();

        self.output = weighted + self.bias;
        Ok(self.output)
    }

    fn get_model(&self) -> ParameterVector {
        let mut values = self.weights.to_vec();
        values.push(self.bias);
        ParameterVector::new(values)
    }

    fn set_model(&mut self, parameters: &ParameterVector) -> Result<()> {
        parameters.ensure_arity(NODE_ARITY)?;
        self.weights.copy_from_slice(&parameters[..INPUTS]);
        self.bias = parameters[INPUTS];
        Ok(())
    }

    fn reset(&mut self) {
        self.output = 0.0;
    }

    fn output(&self) -> f64 {
        self.output
    }
}
