//! Mutation engine
//!
//! Produces the next trial configuration from the current one and the last
//! accepted one. Moved coordinates keep going in the direction they moved,
//! subject to the epsilon gate; when nothing qualifies a single coordinate gets
//! a bounded random nudge, so a mutation always changes something.

pub mod gain;
pub mod sampler;

pub use self::gain::improvement_gain;
pub use self::sampler::Sampler;

use adaptune_common::ParameterVector;
use tracing::trace;

use crate::exploration::Tuning;

/// Mutate `current` relative to `previous`, returning a new vector
pub fn mutate(
    current: &ParameterVector,
    previous: &ParameterVector,
    tuning: &Tuning,
    sampler: &mut dyn Sampler,
) -> ParameterVector {
    let intensity = tuning.multiplier;

    for index in current.moved_from(previous) {
        let draw = sampler.uniform();
        if draw > tuning.epsilon {
            let origin = previous.get(index).copied().unwrap_or(0.0);
            let step = (current[index] - origin) * tuning.improve_multiplier * draw * intensity;
            trace!(index, step, "Directional mutation");
            return current.with(index, current[index] + step);
        }
    }

    if current.arity() == 0 {
        return current.clone();
    }

    let unmoved: Vec<usize> = (0..current.arity())
        .filter(|&i| previous.get(i) == Some(&current[i]))
        .collect();
    let candidates: Vec<usize> = if unmoved.is_empty() {
        (0..current.arity()).collect()
    } else {
        unmoved
    };

    let index = candidates[sampler.pick(candidates.len())];
    let mut offset = (sampler.uniform() - 0.5) * tuning.random_multiplier * intensity;
    if offset == 0.0 {
        offset = 0.5 * tuning.random_multiplier * intensity;
    }
    let value = current[index];
    let mut nudged = value + offset;
    if nudged == value {
        // offset fell below the coordinate's precision; step at least one ulp
        let direction = if offset < 0.0 { -1.0 } else { 1.0 };
        nudged = value + direction * f64::EPSILON * value.abs().max(1.0);
    }
    trace!(index, offset = nudged - value, "Random mutation");
    current.with(index, nudged)
}
