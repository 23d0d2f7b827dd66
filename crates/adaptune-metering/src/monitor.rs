//! Episode monitor: buffers records and reduces them per learning window

use adaptune_common::{MonitorError, Result};
use chrono::Utc;
use tracing::info;

use crate::record::MetricRecord;
use crate::summary::{summarize, StatisticsResult};
use crate::table::{render, Cell};
use crate::{DEFAULT_INDEX_METRIC, DEFAULT_KEY_METRIC};

const OVERVIEW_HEADERS: [&str; 8] = [
    "episodes",
    "highest",
    "average",
    "lowest",
    "median",
    "middle",
    "epsilon",
    "multiplier",
];

const CATEGORY_HEADERS: [&str; 6] = [
    "category", "highest", "average", "lowest", "median", "middle",
];

#[derive(Debug, Clone)]
pub struct EpisodeMonitor {
    buffer: Vec<MetricRecord>,
    results: Vec<StatisticsResult>,
    key_metric: String,
    index_metric: String,
}

impl EpisodeMonitor {
    pub fn new(key_metric: impl Into<String>, index_metric: impl Into<String>) -> Self {
        Self {
            buffer: Vec::new(),
            results: Vec::new(),
            key_metric: key_metric.into(),
            index_metric: index_metric.into(),
        }
    }

    /// Buffer the record of a finished episode
    pub fn monitor(&mut self, record: MetricRecord) {
        self.buffer.push(record);
    }

    /// Reduce the last `window_size` buffered records into a new result
    ///
    /// A window of zero, or one larger than the buffer, covers every buffered
    /// record. The buffer is drained only when the reduction succeeds.
    pub fn process(
        &mut self,
        window_size: usize,
        epsilon: f64,
        multiplier: f64,
    ) -> Result<&StatisticsResult> {
        if self.buffer.is_empty() {
            return Err(MonitorError::InsufficientData(
                "no episodes recorded since the last window".to_string(),
            )
            .into());
        }

        let start = match window_size {
            0 => 0,
            size => self.buffer.len().saturating_sub(size),
        };
        let window = &self.buffer[start..];
        let metrics = summarize(window, &self.key_metric, &self.index_metric)?;

        let result = StatisticsResult {
            episodes: window.len(),
            epsilon,
            multiplier,
            key_metric: self.key_metric.clone(),
            metrics,
            recorded_at: Utc::now(),
        };
        self.buffer.clear();

        if let Some(key) = result.key() {
            info!(
                episodes = result.episodes,
                highest = key.highest,
                average = key.average,
                lowest = key.lowest,
                epsilon,
                multiplier,
                "Processed episode window"
            );
        }

        self.results.push(result);
        self.latest()
            .ok_or_else(|| MonitorError::InsufficientData("no results".to_string()).into())
    }

    pub fn buffer(&self) -> &[MetricRecord] {
        &self.buffer
    }

    pub fn results(&self) -> &[StatisticsResult] {
        &self.results
    }

    pub fn latest(&self) -> Option<&StatisticsResult> {
        self.results.last()
    }

    pub fn key_metric(&self) -> &str {
        &self.key_metric
    }

    /// Render the latest result as an overview table and a per-metric table
    pub fn get_log(&self) -> Result<String> {
        let result = self.latest().ok_or_else(|| {
            MonitorError::InsufficientData("no window has been processed".to_string())
        })?;
        let key = result.key().ok_or_else(|| MonitorError::MissingMetric {
            name: result.key_metric.clone(),
        })?;

        let overview = render(
            &OVERVIEW_HEADERS,
            &[vec![
                Cell::Number(result.episodes as f64),
                Cell::Number(key.highest),
                Cell::Number(key.average),
                Cell::Number(key.lowest),
                Cell::Number(key.median),
                Cell::Number(key.middle),
                Cell::Number(result.epsilon),
                Cell::Number(result.multiplier),
            ]],
        );

        let rows: Vec<Vec<Cell>> = result
            .metrics
            .iter()
            .map(|summary| {
                vec![
                    Cell::Text(summary.category.clone()),
                    Cell::Number(summary.highest),
                    Cell::Number(summary.average),
                    Cell::Number(summary.lowest),
                    Cell::Number(summary.median),
                    Cell::Number(summary.middle),
                ]
            })
            .collect();
        let categories = render(&CATEGORY_HEADERS, &rows);

        Ok(format!("\n{overview}\n\n{categories}\n"))
    }

    /// Result history as a JSON array
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.results)?)
    }
}

impl Default for EpisodeMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_METRIC, DEFAULT_INDEX_METRIC)
    }
}
