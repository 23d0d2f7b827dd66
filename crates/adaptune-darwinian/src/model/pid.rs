//! PID model for setpoint tracking

use adaptune_common::{ModelError, ParameterVector, Result};

use super::Model;
use crate::PID_ARITY;

/// PID model
///
/// Reads one designated component of the observation window and drives its
/// error towards zero. The integral accumulates without decay or clamping.
#[derive(Debug, Clone, PartialEq)]
pub struct PidModel {
    p: f64,
    i: f64,
    d: f64,
    input: usize,
    integral: f64,
    last_error: f64,
    output: f64,
}

impl PidModel {
    pub fn new(gains: [f64; PID_ARITY]) -> Self {
        let [p, i, d] = gains;
        Self {
            p,
            i,
            d,
            input: 0,
            integral: 0.0,
            last_error: 0.0,
            output: 0.0,
        }
    }

    /// Build from a parameter vector of arity 3
    pub fn from_parameters(parameters: &ParameterVector) -> Result<Self> {
        let mut model = Self::new([0.0; PID_ARITY]);
        model.set_model(parameters)?;
        Ok(model)
    }

    /// Read the observation component at `index` instead of the first one
    pub fn with_input(mut self, index: usize) -> Self {
        self.input = index;
        self
    }

    pub fn input(&self) -> usize {
        self.input
    }

    /// Accumulated error since the last reset
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Error seen on the previous step
    pub fn last_error(&self) -> f64 {
        self.last_error
    }
}

impl Model for PidModel {
    fn arity(&self) -> usize {
        PID_ARITY
    }

    fn get_output(&mut self, observation: &[f64], setpoint: f64) -> Result<f64> {
        let value = observation
            .get(self.input)
            .copied()
            .ok_or(ModelError::MissingInput {
                index: self.input,
                len: observation.len(),
            })?;

        let error = setpoint - value;
        self.integral += error;

        let proportional = self.p * error;
        let integral = self.i * (error - self.integral);
        let derivative = self.d * (error - self.last_error);

        self.last_error = error;
        self.output = proportional + integral + derivative;
        Ok(self.output)
    }

    fn get_model(&self) -> ParameterVector {
        ParameterVector::from([self.p, self.i, self.d])
    }

    fn set_model(&mut self, parameters: &ParameterVector) -> Result<()> {
        parameters.ensure_arity(PID_ARITY)?;
        self.p = parameters[0];
        self.i = parameters[1];
        self.d = parameters[2];
        Ok(())
    }

    fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
        self.output = 0.0;
    }

    fn output(&self) -> f64 {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adaptune_common::AdaptuneError;
    use proptest::prelude::*;

    const PID: [f64; 3] = [10.0, 0.1, 2.0];

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_set_model() {
        let mut model = PidModel::new(PID);
        model.set_model(&ParameterVector::from([5.0, 1.0, 9.0])).unwrap();
        assert_eq!(model.get_model(), ParameterVector::from([5.0, 1.0, 9.0]));
    }

    #[test]
    fn test_set_model_arity_mismatch() {
        let mut model = PidModel::new(PID);
        let err = model
            .set_model(&ParameterVector::from([1.0, 4.0, 5.0, 6.0]))
            .unwrap_err();
        assert!(matches!(
            err,
            AdaptuneError::Model(ModelError::ArityMismatch {
                expected: 3,
                actual: 4
            })
        ));
        assert_eq!(model.get_model(), ParameterVector::from(PID));
    }

    #[test]
    fn test_get_output_positive() {
        let mut model = PidModel::new(PID);

        let output = model.get_output(&[10.0], 100.0).unwrap();
        assert!(close(model.integral(), 90.0));
        assert!(close(model.last_error(), 90.0));
        assert!(close(output, 900.0 + 0.0 + 180.0));

        let output = model.get_output(&[10.0], 100.0).unwrap();
        assert!(close(model.integral(), 180.0));
        assert!(close(output, 900.0 - 9.0 + 0.0));

        let output = model.get_output(&[10.0], 100.0).unwrap();
        assert!(close(model.integral(), 270.0));
        assert!(close(output, 900.0 - 18.0 + 0.0));
        assert!(close(model.output(), output));
    }

    #[test]
    fn test_get_output_negative() {
        let mut model = PidModel::new(PID);
        let output = model.get_output(&[-1.0], -10.0).unwrap();
        assert!(close(output, -90.0 + 0.0 - 18.0));
        let output = model.get_output(&[-1.0], -10.0).unwrap();
        assert!(close(output, -90.0 + 0.9 + 0.0));
    }

    #[test]
    fn test_designated_input() {
        let mut model = PidModel::new([1.0, 0.0, 0.0]).with_input(2);
        let output = model.get_output(&[100.0, 100.0, 0.5], 0.0).unwrap();
        assert!(close(output, -0.5));

        let err = model.get_output(&[1.0], 0.0).unwrap_err();
        assert!(matches!(
            err,
            AdaptuneError::Model(ModelError::MissingInput { index: 2, len: 1 })
        ));
    }

    #[test]
    fn test_reset() {
        let mut model = PidModel::new(PID);
        model.get_output(&[10.0], 100.0).unwrap();
        model.reset();
        assert_eq!(model.integral(), 0.0);
        assert_eq!(model.last_error(), 0.0);
        assert_eq!(model.output(), 0.0);
        assert_eq!(model.get_model(), ParameterVector::from(PID));
    }

    proptest! {
        #[test]
        fn prop_reset_reproduces_first_output(
            p in -50.0f64..50.0,
            i in -5.0f64..5.0,
            d in -10.0f64..10.0,
            value in -100.0f64..100.0,
            setpoint in -100.0f64..100.0,
            noise in proptest::collection::vec(-100.0f64..100.0, 0..8),
        ) {
            let mut model = PidModel::new([p, i, d]);
            let first = model.get_output(&[value], setpoint).unwrap();
            for sample in noise {
                model.get_output(&[sample], setpoint).unwrap();
            }
            model.reset();
            prop_assert_eq!(model.get_output(&[value], setpoint).unwrap(), first);
        }
    }
}
