//! Improvement gain: how much a trial total improved on its baseline
//!
//! For two positive totals this is the plain ratio `new / old`. Totals at or
//! below zero go through a steep positive map first, so the gain stays positive,
//! stays monotone in `new`, and is above 1 exactly when `new > old`.

/// Stand-in magnitude of a zero total
const ZERO_FLOOR: f64 = 1e-3;

/// Steepness of the map below zero
const NEGATIVE_STEEPNESS: f64 = 10.0;

fn magnitude(total: f64) -> f64 {
    if total > 0.0 {
        total
    } else {
        ZERO_FLOOR * (NEGATIVE_STEEPNESS * total).exp()
    }
}

/// Ratio of a new reward total to a baseline total
pub fn improvement_gain(new_total: f64, old_total: f64) -> f64 {
    if new_total == old_total {
        return 1.0;
    }
    match (new_total > 0.0, old_total > 0.0) {
        (true, true) => new_total / old_total,
        // same map on both sides: the floors cancel
        (false, false) => (NEGATIVE_STEEPNESS * (new_total - old_total)).exp(),
        _ => magnitude(new_total) / magnitude(old_total),
    }
}
