//! ParameterVector - ordered coefficients of a control model
//!
//! A PID model carries three gains (proportional, integral, derivative), a node
//! model carries three weights and a bias. The vector is the optimizer's working
//! copy: controllers keep a current and a previously accepted one, and the model
//! holds the applied one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

use crate::error::ModelError;

/// Ordered, fixed-arity tuple of real-valued coefficients
///
/// Serializes as a plain list of numbers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterVector(Vec<f64>);

impl ParameterVector {
    /// Create a vector from any list of coefficients
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self(values.into())
    }

    /// All-zero vector of the given arity
    pub fn zeros(arity: usize) -> Self {
        Self(vec![0.0; arity])
    }

    /// Number of coefficients
    #[inline]
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Fail with an arity mismatch unless the vector has exactly `expected` entries
    pub fn ensure_arity(&self, expected: usize) -> Result<(), ModelError> {
        if self.arity() == expected {
            Ok(())
        } else {
            Err(ModelError::ArityMismatch {
                expected,
                actual: self.arity(),
            })
        }
    }

    /// Copy of this vector with one coordinate replaced
    pub fn with(&self, index: usize, value: f64) -> Self {
        let mut values = self.0.clone();
        if let Some(slot) = values.get_mut(index) {
            *slot = value;
        }
        Self(values)
    }

    /// Coordinates where `self` differs from `other`
    ///
    /// Coordinates beyond the end of `other` count as moved.
    pub fn moved_from<'a>(&'a self, other: &'a ParameterVector) -> impl Iterator<Item = usize> + 'a {
        self.0
            .iter()
            .enumerate()
            .filter(move |(i, value)| other.0.get(*i) != Some(*value))
            .map(|(i, _)| i)
    }

    /// Consume into the underlying list
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for ParameterVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for ParameterVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[f64; N]> for ParameterVector {
    fn from(values: [f64; N]) -> Self {
        Self(values.to_vec())
    }
}

impl From<&[f64]> for ParameterVector {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

/// Render one coefficient rounded to display precision, without trailing zeros
fn format_coefficient(value: f64) -> String {
    let rounded = format!("{:.*}", crate::PARAMETER_DISPLAY_PRECISION, value);
    let trimmed = if rounded.contains('.') {
        rounded.trim_end_matches('0').trim_end_matches('.')
    } else {
        rounded.as_str()
    };
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

impl fmt::Display for ParameterVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().copied().map(format_coefficient).collect();
        write!(f, "({})", parts.join(", "))
    }
}
