#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the aerovia air-quality / transit analytics pipeline.
//!
//! This crate provides the foundational building blocks shared by the
//! generators, cleaning pipeline, and statistics engine: typed daily
//! records, the immutable [`TimeSeriesTable`] container, the
//! [`FeatureTable`] DataFrame wrapper handed to presentation layers,
//! fixed column schemas, and the workspace-wide error taxonomy.

/// The version of the aerovia-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod schema;
pub mod stats;
pub mod types;

// Re-exports
pub use error::{AeroviaError, Result};
pub use types::{
    AqiCategory, AqiRecord, DailyRecord, DatedRecord, Date, FeatureTable, TimeSeriesTable,
    TransportRecord,
};
