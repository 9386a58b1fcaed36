//! OpenAQ API client for aerovia.
//!
//! This crate provides a client for fetching real air-quality measurements
//! from the [OpenAQ](https://openaq.org/) API and assembling them into the
//! daily series the rest of the pipeline consumes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use aerovia_openaq::OpenAqClient;
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAqClient::from_env();
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!     let series = client.daily_series("2178", start, 90).await?;
//!
//!     println!("{} daily records", series.len());
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! `OPENAQ_API_KEY` (optional) raises the rate limit; `AEROVIA_OPENAQ_URL`
//! overrides the base URL. Both may come from a `.env` file.

mod aqi_scale;
mod client;
mod error;
mod types;

pub use aqi_scale::{PM25_BREAKPOINTS, aqi_from_pm25};
pub use client::OpenAqClient;
pub use error::OpenAqError;
pub use types::*;

/// Result type for OpenAQ operations.
pub type Result<T> = std::result::Result<T, OpenAqError>;
