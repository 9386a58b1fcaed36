//! Filtered analysis over a feature table.
//!
//! The engine reads a [`FeatureTable`], applies an [`AnalysisFilter`],
//! and produces an [`AnalysisReport`]: every (air-quality metric ×
//! transport metric) correlation pair, grouped ridership aggregates by
//! weekday and AQI category, and dataset summary statistics. The engine
//! never mutates the table; identical filters produce identical reports.

use crate::pearson::{CorrelationResult, SIGNIFICANCE_LEVEL, pearson};
use crate::summary::{ColumnSummary, SummaryStatistics};
use aerovia_traits::schema::{
    AQ_METRIC_COLUMNS, COL_AQI, COL_AQI_CATEGORY, COL_DATE, COL_DAY_OF_WEEK,
    TRANSPORT_METRIC_COLUMNS,
};
use aerovia_traits::stats::{mean, median};
use aerovia_traits::types::{AqiCategory, Date, FeatureTable};
use aerovia_traits::{AeroviaError, Result};
use ndarray::Array1;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Weekday bucket order for grouped aggregates.
const WEEKDAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Restriction of the analysis to a sub-range of the table.
///
/// All bounds are inclusive; `None` leaves that side unbounded. Applying
/// a filter never mutates the underlying table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisFilter {
    /// Earliest date to include.
    pub start: Option<Date>,
    /// Latest date to include.
    pub end: Option<Date>,
    /// Highest AQI to include.
    pub max_aqi: Option<f64>,
}

impl AnalysisFilter {
    fn retains(&self, date: Date, aqi: f64) -> bool {
        self.start.is_none_or(|s| date >= s)
            && self.end.is_none_or(|e| date <= e)
            && self.max_aqi.is_none_or(|ceiling| aqi <= ceiling)
    }
}

/// Configuration for the analysis engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Two-tailed p-value below which a correlation is flagged
    /// significant.
    pub significance_level: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            significance_level: SIGNIFICANCE_LEVEL,
        }
    }
}

/// Mean/median/count of one transport metric within a bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAggregate {
    /// Transport metric column.
    pub metric: String,
    /// Bucket mean.
    pub mean: f64,
    /// Bucket median.
    pub median: f64,
    /// Rows in the bucket.
    pub count: usize,
}

/// One grouping bucket (a weekday or an AQI category).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateBucket {
    /// Bucket key: weekday name or category label.
    pub key: String,
    /// Aggregates per transport metric.
    pub metrics: Vec<MetricAggregate>,
}

/// Grouped aggregates over the filtered range.
///
/// Buckets appear in their natural order (Monday first, ascending
/// severity); empty buckets are omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAggregates {
    /// Buckets keyed by weekday name.
    pub by_weekday: Vec<AggregateBucket>,
    /// Buckets keyed by AQI category label.
    pub by_category: Vec<AggregateBucket>,
}

/// Everything the presentation layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// One result per (air-quality metric, transport metric) pair.
    pub correlations: Vec<CorrelationResult>,
    /// Grouped ridership aggregates.
    pub aggregates: GroupedAggregates,
    /// Dataset summary over the filtered range.
    pub summary: SummaryStatistics,
}

/// Correlation and aggregation engine.
#[derive(Debug, Clone, Default)]
pub struct AnalysisEngine {
    config: EngineConfig,
}

impl AnalysisEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Analyze a feature table under a filter.
    ///
    /// Statistics are total over the filtered domain: degenerate pairs
    /// report the undefined sentinel, and an empty filtered range yields
    /// an empty report rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`AeroviaError::MissingColumn`] if the table lacks a
    /// required column and [`AeroviaError::InvalidDate`] if a date cell
    /// is unparsable.
    pub fn analyze(&self, features: &FeatureTable, filter: &AnalysisFilter) -> Result<AnalysisReport> {
        for col in [COL_DATE, COL_DAY_OF_WEEK, COL_AQI_CATEGORY]
            .iter()
            .chain(AQ_METRIC_COLUMNS.iter())
            .chain(TRANSPORT_METRIC_COLUMNS.iter())
        {
            if !features.has_column(col) {
                return Err(AeroviaError::MissingColumn((*col).to_string()));
            }
        }

        let df = features.data();
        let dates = date_column(df)?;
        let aqi_values = f64_column(df, COL_AQI)?;

        let keep: Vec<bool> = dates
            .iter()
            .zip(&aqi_values)
            .map(|(&date, &aqi)| filter.retains(date, aqi))
            .collect();
        let kept_dates: Vec<Date> = dates
            .iter()
            .zip(&keep)
            .filter_map(|(&d, &k)| k.then_some(d))
            .collect();

        let mut aq_metrics = Vec::with_capacity(AQ_METRIC_COLUMNS.len());
        for name in AQ_METRIC_COLUMNS {
            aq_metrics.push((name, filtered(&f64_column(df, name)?, &keep)));
        }
        let mut transport_metrics = Vec::with_capacity(TRANSPORT_METRIC_COLUMNS.len());
        for name in TRANSPORT_METRIC_COLUMNS {
            transport_metrics.push((name, filtered(&f64_column(df, name)?, &keep)));
        }

        let mut correlations =
            Vec::with_capacity(aq_metrics.len() * transport_metrics.len());
        for (aq_name, aq) in &aq_metrics {
            for (t_name, t) in &transport_metrics {
                let (coefficient, p_value) = pearson(aq.view(), t.view());
                correlations.push(CorrelationResult {
                    metric_a: (*aq_name).to_string(),
                    metric_b: (*t_name).to_string(),
                    coefficient,
                    p_value,
                    significant: coefficient.is_some()
                        && p_value < self.config.significance_level,
                    n_obs: aq.len(),
                });
            }
        }

        let weekdays = filtered_strings(df, COL_DAY_OF_WEEK, &keep)?;
        let categories = filtered_strings(df, COL_AQI_CATEGORY, &keep)?;
        let category_order: Vec<&str> =
            AqiCategory::ALL.iter().map(|c| c.label()).collect();

        let aggregates = GroupedAggregates {
            by_weekday: bucketize(&weekdays, &WEEKDAY_ORDER, &transport_metrics),
            by_category: bucketize(&categories, &category_order, &transport_metrics),
        };

        let summary = SummaryStatistics {
            total_days: kept_dates.len(),
            start: kept_dates.first().copied(),
            end: kept_dates.last().copied(),
            aqi_stats: aq_metrics
                .iter()
                .map(|(name, values)| ColumnSummary::describe(name, values.as_slice().unwrap_or(&[])))
                .collect(),
            transport_stats: transport_metrics
                .iter()
                .map(|(name, values)| ColumnSummary::describe(name, values.as_slice().unwrap_or(&[])))
                .collect(),
            category_distribution: distribution(&categories, &category_order),
        };

        Ok(AnalysisReport {
            correlations,
            aggregates,
            summary,
        })
    }
}

/// Group rows by label and aggregate every transport metric per bucket.
/// One pass to collect, one short pass per bucket to describe.
fn bucketize(
    labels: &[String],
    order: &[&str],
    metrics: &[(&str, Array1<f64>)],
) -> Vec<AggregateBucket> {
    let mut rows_by_label: HashMap<&str, Vec<usize>> = HashMap::new();
    for (row, label) in labels.iter().enumerate() {
        rows_by_label.entry(label.as_str()).or_default().push(row);
    }

    order
        .iter()
        .filter_map(|&key| {
            let rows = rows_by_label.get(key)?;
            let metrics = metrics
                .iter()
                .map(|(name, values)| {
                    let bucket: Vec<f64> = rows.iter().map(|&i| values[i]).collect();
                    MetricAggregate {
                        metric: (*name).to_string(),
                        mean: mean(&bucket),
                        median: median(&bucket),
                        count: bucket.len(),
                    }
                })
                .collect();
            Some(AggregateBucket {
                key: key.to_string(),
                metrics,
            })
        })
        .collect()
}

/// Count rows per label, in the given order, omitting absent labels.
fn distribution(labels: &[String], order: &[&str]) -> Vec<(String, usize)> {
    order
        .iter()
        .filter_map(|&key| {
            let count = labels.iter().filter(|l| l.as_str() == key).count();
            (count > 0).then(|| (key.to_string(), count))
        })
        .collect()
}

fn filtered(values: &[f64], keep: &[bool]) -> Array1<f64> {
    values
        .iter()
        .zip(keep)
        .filter_map(|(&v, &k)| k.then_some(v))
        .collect()
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

fn date_column(df: &DataFrame) -> Result<Vec<Date>> {
    df.column(COL_DATE)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|cell| {
            let raw = cell.ok_or_else(|| AeroviaError::InvalidDate("null date cell".to_string()))?;
            Date::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AeroviaError::InvalidDate(raw.to_string()))
        })
        .collect()
}

/// Null label cells become empty strings so the vector stays row-aligned
/// with the filtered metric arrays; an empty label matches no bucket.
fn filtered_strings(df: &DataFrame, name: &str, keep: &[bool]) -> Result<Vec<String>> {
    Ok(df
        .column(name)?
        .as_materialized_series()
        .str()?
        .into_iter()
        .zip(keep)
        .filter_map(|(cell, &k)| k.then(|| cell.unwrap_or_default().to_string()))
        .collect())
}
