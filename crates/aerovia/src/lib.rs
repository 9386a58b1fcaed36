#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # aerovia
//!
//! Correlation analytics between urban air quality and public-transport
//! ridership.
//!
//! aerovia is an umbrella crate that re-exports all aerovia sub-crates
//! for convenience. The pipeline generates (or fetches) daily AQI and
//! ridership series, cleans and merges them into a single table, derives
//! calendar / lag / rolling features, and computes Pearson correlations
//! with significance tests plus grouped aggregates.
//!
//! ## Quick Start
//!
//! ```ignore
//! use aerovia::gen::{AqiGenConfig, TransportGenConfig, generate_aqi, generate_transport};
//! use aerovia::pipeline::{CleanConfig, clean_aqi, clean_transport, engineer_features, merge};
//! use aerovia::stats::{AnalysisEngine, AnalysisFilter};
//! use aerovia::types::Date;
//!
//! # fn main() -> aerovia::Result<()> {
//! let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
//! let aqi = generate_aqi(&AqiGenConfig::new(start, 90, 42))?;
//! let transport = generate_transport(&TransportGenConfig::new(start, 90, 42), &aqi)?;
//!
//! let config = CleanConfig::default();
//! let merged = merge(
//!     &clean_aqi(aqi.into_records(), &config)?,
//!     &clean_transport(transport.into_records(), &config)?,
//! )?;
//! let features = engineer_features(&merged)?;
//!
//! let report = AnalysisEngine::default().analyze(&features, &AnalysisFilter::default())?;
//! for result in &report.correlations {
//!     println!("{} vs {}: {:?}", result.metric_a, result.metric_b, result.coefficient);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Core types ([`TimeSeriesTable`], records, errors, schemas)
//! - [`gen`] - Deterministic synthetic generators and fetch-with-fallback
//! - [`openaq`] - OpenAQ measurement API client
//! - [`pipeline`] - CSV interchange, cleaning, merging, feature engineering
//! - [`stats`] - Correlations, grouped aggregates, summary statistics
//!
//! [`TimeSeriesTable`]: types::TimeSeriesTable

/// Version information for the aerovia crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core types and errors.
///
/// Re-exports the foundational types the whole workspace shares: the
/// record structs, [`TimeSeriesTable`](types::TimeSeriesTable), the
/// error taxonomy, and the fixed column schemas.
pub mod traits {
    pub use aerovia_traits::*;
}

// Re-export error types
pub use aerovia_traits::{AeroviaError, Result};

// Re-export common types
pub use aerovia_traits::types;
pub use aerovia_traits::types::{
    AqiCategory, AqiRecord, DailyRecord, Date, FeatureTable, TimeSeriesTable, TransportRecord,
};

/// Synthetic series generation.
///
/// Deterministic, seeded AQI and ridership generators plus the
/// fetch-with-fallback wrapper that prefers real measurements but never
/// fails when the network does.
pub mod r#gen {
    pub use aerovia_gen::*;
}

/// OpenAQ measurement API client.
///
/// ## Setup
///
/// Set `OPENAQ_API_KEY` in the environment or a `.env` file to raise the
/// rate limit; anonymous access also works.
pub mod openaq {
    pub use aerovia_openaq::*;
}

/// Data pipeline: CSV interchange, cleaning, merging, feature
/// engineering, and result memoization.
pub mod pipeline {
    pub use aerovia_pipeline::*;
}

/// Correlation and aggregate statistics.
///
/// Pearson r with two-tailed p-values over every (air-quality metric ×
/// transport metric) pair, grouped ridership aggregates, and dataset
/// summaries.
pub mod stats {
    pub use aerovia_stats::*;
}

/// Prelude module for convenient imports.
///
/// ```ignore
/// use aerovia::prelude::*;
/// ```
pub mod prelude {
    pub use crate::r#gen::{AqiGenConfig, TransportGenConfig, generate_aqi, generate_transport};
    pub use crate::pipeline::{CleanConfig, clean_aqi, clean_transport, engineer_features, merge};
    pub use crate::stats::{AnalysisEngine, AnalysisFilter, AnalysisReport};
    pub use crate::types::{
        AqiCategory, AqiRecord, DailyRecord, Date, FeatureTable, TimeSeriesTable, TransportRecord,
    };
    pub use crate::{AeroviaError, Result};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_error_types() {
        let _result: Result<()> = Ok(());
        let _error: AeroviaError = AeroviaError::InvalidData("test".to_string());
    }
}
