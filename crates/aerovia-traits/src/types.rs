//! Common types used throughout the aerovia pipeline.
//!
//! This module defines the typed daily records, the immutable
//! [`TimeSeriesTable`] container the pipeline stages exchange, and the
//! [`FeatureTable`] DataFrame wrapper produced by the feature engineer.

use crate::error::{AeroviaError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A record keyed by a calendar date.
///
/// Implemented by every row type that participates in a
/// [`TimeSeriesTable`]; the table uses the date as its sole sort and
/// join key.
pub trait DatedRecord: Clone {
    /// The calendar date this record describes.
    fn date(&self) -> Date;
}

/// One day of air-quality measurements.
///
/// `aqi` is the composite index on the 0–500 scale; the sub-pollutants
/// are concentrations in micrograms per cubic meter and are always
/// non-negative after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiRecord {
    /// Calendar date (unique key).
    pub date: Date,
    /// PM2.5 concentration.
    pub pm25: f64,
    /// PM10 concentration.
    pub pm10: f64,
    /// Nitrogen dioxide concentration.
    pub no2: f64,
    /// Ozone concentration.
    pub ozone: f64,
    /// Composite Air Quality Index, clamped to [0, 500].
    pub aqi: f64,
}

impl DatedRecord for AqiRecord {
    fn date(&self) -> Date {
        self.date
    }
}

/// One day of public-transport ridership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportRecord {
    /// Calendar date (unique key).
    pub date: Date,
    /// Bus boardings for the day.
    pub bus_passengers: u32,
    /// Metro boardings for the day.
    pub metro_passengers: u32,
}

impl DatedRecord for TransportRecord {
    fn date(&self) -> Date {
        self.date
    }
}

/// One merged day: air quality joined with ridership on the date key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar date (unique key).
    pub date: Date,
    /// PM2.5 concentration.
    pub pm25: f64,
    /// PM10 concentration.
    pub pm10: f64,
    /// Nitrogen dioxide concentration.
    pub no2: f64,
    /// Ozone concentration.
    pub ozone: f64,
    /// Composite Air Quality Index, clamped to [0, 500].
    pub aqi: f64,
    /// Bus boardings for the day.
    pub bus_passengers: u32,
    /// Metro boardings for the day.
    pub metro_passengers: u32,
}

impl DatedRecord for DailyRecord {
    fn date(&self) -> Date {
        self.date
    }
}

/// EPA air-quality category derived from the composite AQI.
///
/// The thresholds are the fixed, non-overlapping EPA bands; every AQI in
/// [0, 500] maps to exactly one category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum AqiCategory {
    /// AQI 0–50.
    #[display("Good")]
    Good,
    /// AQI 51–100.
    #[display("Moderate")]
    Moderate,
    /// AQI 101–150.
    #[display("Unhealthy for Sensitive Groups")]
    UnhealthySensitive,
    /// AQI 151–200.
    #[display("Unhealthy")]
    Unhealthy,
    /// AQI 201–300.
    #[display("Very Unhealthy")]
    VeryUnhealthy,
    /// AQI 301–500.
    #[display("Hazardous")]
    Hazardous,
}

impl AqiCategory {
    /// All categories in ascending severity order.
    pub const ALL: [Self; 6] = [
        Self::Good,
        Self::Moderate,
        Self::UnhealthySensitive,
        Self::Unhealthy,
        Self::VeryUnhealthy,
        Self::Hazardous,
    ];

    /// Classify an AQI value into its EPA band.
    ///
    /// Values are expected to lie in [0, 500] after cleaning; anything
    /// above 300 maps to [`Self::Hazardous`].
    #[must_use]
    pub fn from_aqi(aqi: f64) -> Self {
        if aqi <= 50.0 {
            Self::Good
        } else if aqi <= 100.0 {
            Self::Moderate
        } else if aqi <= 150.0 {
            Self::UnhealthySensitive
        } else if aqi <= 200.0 {
            Self::Unhealthy
        } else if aqi <= 300.0 {
            Self::VeryUnhealthy
        } else {
            Self::Hazardous
        }
    }

    /// Short label used as the grouping key in feature tables.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

/// An immutable, date-sorted sequence of daily records.
///
/// The table holds exactly one record per calendar date and is sorted
/// ascending by date. It is immutable after construction: every pipeline
/// transformation consumes a table (or borrows it) and produces a new
/// one rather than mutating in place.
///
/// # Example
///
/// ```
/// use aerovia_traits::types::{Date, TimeSeriesTable, TransportRecord};
///
/// let rows = vec![
///     TransportRecord {
///         date: Date::from_ymd_opt(2024, 1, 2).unwrap(),
///         bus_passengers: 14_000,
///         metro_passengers: 24_000,
///     },
///     TransportRecord {
///         date: Date::from_ymd_opt(2024, 1, 1).unwrap(),
///         bus_passengers: 15_000,
///         metro_passengers: 25_000,
///     },
/// ];
///
/// let table = TimeSeriesTable::from_records(rows).unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.first_date(), Date::from_ymd_opt(2024, 1, 1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesTable<R: DatedRecord> {
    records: Vec<R>,
}

impl<R: DatedRecord> TimeSeriesTable<R> {
    /// Build a table from unordered records.
    ///
    /// Records are sorted ascending by date. Duplicate dates are rejected
    /// here; deduplication of raw input is the cleaning pipeline's job,
    /// which resolves duplicates *before* constructing a table.
    ///
    /// # Errors
    ///
    /// Returns [`AeroviaError::InvalidData`] if two records share a date.
    pub fn from_records(mut records: Vec<R>) -> Result<Self> {
        records.sort_by_key(DatedRecord::date);

        for pair in records.windows(2) {
            if pair[0].date() == pair[1].date() {
                return Err(AeroviaError::InvalidData(format!(
                    "duplicate date in time series: {}",
                    pair[0].date()
                )));
            }
        }

        Ok(Self { records })
    }

    /// An empty table.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// The records in ascending date order.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Consumes self and returns the underlying records.
    #[must_use]
    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    /// Number of daily records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest date in the table, if any.
    #[must_use]
    pub fn first_date(&self) -> Option<Date> {
        self.records.first().map(DatedRecord::date)
    }

    /// Latest date in the table, if any.
    #[must_use]
    pub fn last_date(&self) -> Option<Date> {
        self.records.last().map(DatedRecord::date)
    }

    /// Look up the record for a specific date.
    #[must_use]
    pub fn get(&self, date: Date) -> Option<&R> {
        self.records
            .binary_search_by_key(&date, DatedRecord::date)
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Whether the dates form a contiguous daily run with no gaps.
    ///
    /// Empty and single-record tables are trivially contiguous.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.records
            .windows(2)
            .all(|pair| pair[1].date() - pair[0].date() == chrono::Duration::days(1))
    }

    /// Iterate over the records in date order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }
}

impl<'a, R: DatedRecord> IntoIterator for &'a TimeSeriesTable<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Container for the feature-engineered dataset.
///
/// `FeatureTable` wraps a Polars DataFrame holding the merged daily
/// table plus every derived column (calendar features, category labels,
/// lag and rolling-mean columns). It is the in-memory structured dataset
/// handed to the presentation layer and read by the statistics engine;
/// neither ever mutates it.
///
/// Leading rows without enough history for a lag or rolling column carry
/// a null rather than a fabricated value.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    /// The underlying DataFrame.
    data: DataFrame,
}

impl FeatureTable {
    /// Creates a new `FeatureTable` from a DataFrame.
    #[must_use]
    pub const fn new(data: DataFrame) -> Self {
        Self { data }
    }

    /// Returns a reference to the underlying DataFrame.
    #[must_use]
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Consumes self and returns the underlying DataFrame.
    #[must_use]
    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    /// Number of rows (days) in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Returns whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the column names in the table.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Checks if a column exists in the table.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|s| s.as_str() == name)
    }

    /// Gets a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.data.column(name).ok()
    }
}

impl From<DataFrame> for FeatureTable {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}

impl AsRef<DataFrame> for FeatureTable {
    fn as_ref(&self) -> &DataFrame {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn aqi_row(date: Date, aqi: f64) -> AqiRecord {
        AqiRecord {
            date,
            pm25: 15.0,
            pm10: 25.0,
            no2: 20.0,
            ozone: 30.0,
            aqi,
        }
    }

    #[test]
    fn test_from_records_sorts_by_date() {
        let table = TimeSeriesTable::from_records(vec![
            aqi_row(d(2024, 1, 3), 60.0),
            aqi_row(d(2024, 1, 1), 40.0),
            aqi_row(d(2024, 1, 2), 50.0),
        ])
        .unwrap();

        assert_eq!(table.first_date(), Some(d(2024, 1, 1)));
        assert_eq!(table.last_date(), Some(d(2024, 1, 3)));
        assert!(table.is_contiguous());
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let result = TimeSeriesTable::from_records(vec![
            aqi_row(d(2024, 1, 1), 40.0),
            aqi_row(d(2024, 1, 1), 55.0),
        ]);
        assert!(matches!(result, Err(AeroviaError::InvalidData(_))));
    }

    #[test]
    fn test_get_by_date() {
        let table = TimeSeriesTable::from_records(vec![
            aqi_row(d(2024, 1, 1), 40.0),
            aqi_row(d(2024, 1, 2), 50.0),
        ])
        .unwrap();

        assert_eq!(table.get(d(2024, 1, 2)).map(|r| r.aqi), Some(50.0));
        assert!(table.get(d(2024, 1, 5)).is_none());
    }

    #[test]
    fn test_contiguity_detects_gaps() {
        let table = TimeSeriesTable::from_records(vec![
            aqi_row(d(2024, 1, 1), 40.0),
            aqi_row(d(2024, 1, 4), 50.0),
        ])
        .unwrap();
        assert!(!table.is_contiguous());
    }

    #[test]
    fn test_empty_table() {
        let table: TimeSeriesTable<AqiRecord> = TimeSeriesTable::empty();
        assert!(table.is_empty());
        assert!(table.is_contiguous());
        assert_eq!(table.first_date(), None);
    }

    #[test]
    fn test_category_thresholds() {
        assert_eq!(AqiCategory::from_aqi(0.0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(50.0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(51.0), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(100.0), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(101.0), AqiCategory::UnhealthySensitive);
        assert_eq!(AqiCategory::from_aqi(150.0), AqiCategory::UnhealthySensitive);
        assert_eq!(AqiCategory::from_aqi(151.0), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(200.0), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(201.0), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_aqi(300.0), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_aqi(301.0), AqiCategory::Hazardous);
        assert_eq!(AqiCategory::from_aqi(500.0), AqiCategory::Hazardous);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(AqiCategory::Good.to_string(), "Good");
        assert_eq!(
            AqiCategory::UnhealthySensitive.to_string(),
            "Unhealthy for Sensitive Groups"
        );
    }

    #[test]
    fn test_feature_table_wrapper() {
        let df = df! {
            "aqi" => &[42.0, 55.0],
            "bus_passengers" => &[15_000i64, 14_200i64],
        }
        .unwrap();

        let table = FeatureTable::new(df);
        assert_eq!(table.len(), 2);
        assert!(table.has_column("aqi"));
        assert!(!table.has_column("ozone"));
        assert_eq!(table.columns().len(), 2);
    }
}
