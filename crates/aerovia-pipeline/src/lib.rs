#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Data pipeline for aerovia: CSV interchange, cleaning, merging, feature
//! engineering, and result memoization.
//!
//! Every stage is a pure function of its declared inputs. Raw rows come in
//! from [`io`], get normalized by [`clean`], joined by [`merge`], and
//! expanded into the analysis-ready [`FeatureTable`] by [`features`];
//! [`cache`] memoizes the products of repeated identical runs.
//!
//! [`FeatureTable`]: aerovia_traits::types::FeatureTable

/// The version of the aerovia-pipeline crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cache;
pub mod clean;
pub mod features;
pub mod io;
pub mod merge;

pub use cache::{FeatureCacheKey, FilterCacheKey, ResultCache};
pub use clean::{CleanConfig, clean_aqi, clean_transport};
pub use features::engineer_features;
pub use io::{LoadReport, SkippedRow};
pub use merge::merge;
