#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Statistics engine for aerovia.
//!
//! Computes Pearson correlations with two-tailed p-values for every
//! (air-quality metric × transport metric) pair, grouped ridership
//! aggregates by weekday and AQI category, and dataset summary
//! statistics, all over an optionally filtered view of a feature table.
//!
//! Every computation is total: degenerate input produces the undefined
//! sentinel, never an error or a panic.

/// The version of the aerovia-stats crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod engine;
pub mod pearson;
pub mod summary;

pub use engine::{
    AggregateBucket, AnalysisEngine, AnalysisFilter, AnalysisReport, EngineConfig,
    GroupedAggregates, MetricAggregate,
};
pub use pearson::{CorrelationResult, SIGNIFICANCE_LEVEL, pearson};
pub use summary::{ColumnSummary, SummaryStatistics};
