//! Window reduction
//!
//! Each statistic picks one representative episode by the key metric and
//! reports every metric of that episode, so a row like "highest" shows the
//! difficulty and episode index that went with the best reward:
//!
//! - highest / lowest: episode with the largest / smallest key value
//! - average: episode whose key value is nearest the mean
//! - median: episode nearest the median of the key values
//! - middle: episode nearest the mid-range `(max + min) / 2`
//!
//! Ties resolve to the earliest episode in the window.

use adaptune_common::{MonitorError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::record::MetricRecord;

/// Representative values of one metric over a window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub category: String,
    pub highest: f64,
    pub average: f64,
    pub lowest: f64,
    pub median: f64,
    pub middle: f64,
}

/// One processed window
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsResult {
    /// Episodes reduced into this result
    pub episodes: usize,
    /// Exploration gate at processing time
    pub epsilon: f64,
    /// Exploration intensity at processing time
    pub multiplier: f64,
    pub key_metric: String,
    pub metrics: Vec<MetricSummary>,
    pub recorded_at: DateTime<Utc>,
}

impl StatisticsResult {
    pub fn metric(&self, category: &str) -> Option<&MetricSummary> {
        self.metrics.iter().find(|m| m.category == category)
    }

    /// Summary of the key metric
    pub fn key(&self) -> Option<&MetricSummary> {
        self.metric(&self.key_metric)
    }
}

/// Indices of the representative episodes, in summary column order
struct Representatives {
    highest: usize,
    average: usize,
    lowest: usize,
    median: usize,
    middle: usize,
}

fn first_by(keys: &[f64], better: impl Fn(f64, f64) -> bool) -> usize {
    let mut best = 0;
    for (i, &key) in keys.iter().enumerate().skip(1) {
        if better(key, keys[best]) {
            best = i;
        }
    }
    best
}

fn nearest(keys: &[f64], target: f64) -> usize {
    first_by(keys, |candidate, best| {
        (candidate - target).abs() < (best - target).abs()
    })
}

fn median(keys: &[f64]) -> f64 {
    let mut sorted = keys.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn representatives(keys: &[f64]) -> Representatives {
    let highest = first_by(keys, |candidate, best| candidate > best);
    let lowest = first_by(keys, |candidate, best| candidate < best);
    let mean = keys.iter().sum::<f64>() / keys.len() as f64;
    let mid_range = (keys[highest] + keys[lowest]) / 2.0;

    Representatives {
        highest,
        average: nearest(keys, mean),
        lowest,
        median: nearest(keys, median(keys)),
        middle: nearest(keys, mid_range),
    }
}

/// Metric names across the window, in first-seen order
fn categories(window: &[MetricRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in window {
        for name in record.names() {
            if !names.iter().any(|known| known == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Reduce a window of records keyed on `key_metric`
///
/// Values of `index_metric` are truncated to integers. A record missing some
/// other metric reports NaN for it.
pub fn summarize(
    window: &[MetricRecord],
    key_metric: &str,
    index_metric: &str,
) -> Result<Vec<MetricSummary>> {
    if window.is_empty() {
        return Err(MonitorError::InsufficientData("empty window".to_string()).into());
    }

    let keys = window
        .iter()
        .map(|record| {
            record.get(key_metric).ok_or_else(|| MonitorError::MissingMetric {
                name: key_metric.to_string(),
            })
        })
        .collect::<std::result::Result<Vec<f64>, _>>()?;

    let picks = representatives(&keys);

    let summaries = categories(window)
        .into_iter()
        .map(|category| {
            let value_at = |index: usize| {
                let value = window[index].get(&category).unwrap_or(f64::NAN);
                if category == index_metric {
                    value.trunc()
                } else {
                    value
                }
            };
            MetricSummary {
                highest: value_at(picks.highest),
                average: value_at(picks.average),
                lowest: value_at(picks.lowest),
                median: value_at(picks.median),
                middle: value_at(picks.middle),
                category,
            }
        })
        .collect();

    Ok(summaries)
}
