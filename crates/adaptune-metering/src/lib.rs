//! # Metering
//!
//! Episode statistics for Adaptune training runs.
//!
//! Every finished episode contributes one [`MetricRecord`] (reward, episode
//! index, anything else the driver measures). On each learning cadence the
//! [`EpisodeMonitor`] reduces the buffered window into a [`StatisticsResult`]
//! and drains the buffer; results accumulate for the whole run and render as
//! pipe tables for the console.

pub mod monitor;
pub mod record;
pub mod summary;
pub mod table;

pub use monitor::EpisodeMonitor;
pub use record::MetricRecord;
pub use summary::{MetricSummary, StatisticsResult};

/// Metric the window statistics are keyed on
pub const DEFAULT_KEY_METRIC: &str = "reward";

/// Metric holding the episode index; reported as an integer
pub const DEFAULT_INDEX_METRIC: &str = "episode";
