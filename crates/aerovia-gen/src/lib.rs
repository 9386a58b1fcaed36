#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Deterministic synthetic generators for daily air-quality and
//! public-transport ridership series.
//!
//! Both generators are pure functions of their configuration: identical
//! `(start, days, seed)` parameters always produce byte-identical
//! output, which the test suite relies on. The transport model is
//! deliberately coupled to the AQI series through a documented penalty
//! function so the downstream statistics engine has a real signal to
//! recover.
//!
//! [`source`] wraps the OpenAQ client with a bounded timeout and an
//! unconditional silent fallback to the synthetic model.

/// The version of the aerovia-gen crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod aqi;
pub mod noise;
pub mod source;
pub mod transport;

pub use aqi::{AqiGenConfig, generate_aqi};
pub use source::{FetchOptions, SeriesSource, SourcedSeries, aqi_series};
pub use transport::{AqiPenalty, TransportGenConfig, generate_transport};
