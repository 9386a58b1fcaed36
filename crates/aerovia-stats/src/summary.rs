//! Dataset summary statistics.

use aerovia_traits::stats::{mean, median, sample_std};
use aerovia_traits::types::Date;
use serde::Serialize;

/// Five-number description of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    /// Column name.
    pub column: String,
    /// Arithmetic mean.
    pub mean: f64,
    /// Median.
    pub median: f64,
    /// Sample standard deviation.
    pub std: f64,
    /// Minimum.
    pub min: f64,
    /// Maximum.
    pub max: f64,
}

impl ColumnSummary {
    /// Summarize one column's values.
    #[must_use]
    pub fn describe(column: &str, values: &[f64]) -> Self {
        Self {
            column: column.to_string(),
            mean: mean(values),
            median: median(values),
            std: sample_std(values),
            min: values.iter().copied().fold(f64::INFINITY, f64::min),
            max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

/// Summary of the analyzed dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    /// Number of days covered after filtering.
    pub total_days: usize,
    /// First date in the filtered range, if any rows survive.
    pub start: Option<Date>,
    /// Last date in the filtered range, if any rows survive.
    pub end: Option<Date>,
    /// Per-column summaries of the air-quality metrics.
    pub aqi_stats: Vec<ColumnSummary>,
    /// Per-column summaries of the transport metrics.
    pub transport_stats: Vec<ColumnSummary>,
    /// Days per AQI category in ascending severity order; empty
    /// categories are omitted.
    pub category_distribution: Vec<(String, usize)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_describe_basic() {
        let summary = ColumnSummary::describe("aqi", &[10.0, 20.0, 30.0, 40.0]);
        assert_relative_eq!(summary.mean, 25.0);
        assert_relative_eq!(summary.median, 25.0);
        assert_relative_eq!(summary.min, 10.0);
        assert_relative_eq!(summary.max, 40.0);
        assert!(summary.std > 0.0);
    }
}
