//! Fixed column schemas for the tabular interchange format.
//!
//! Each table the pipeline reads or writes has a named, typed schema
//! enforced at the ingestion boundary; structurally invalid input (a
//! missing required column) fails the whole load as a
//! [`AeroviaError::MissingColumn`](crate::AeroviaError::MissingColumn).

use crate::error::{AeroviaError, Result};

/// Calendar date column, ISO-8601, present in every table.
pub const COL_DATE: &str = "date";
/// PM2.5 concentration column.
pub const COL_PM25: &str = "pm25";
/// PM10 concentration column.
pub const COL_PM10: &str = "pm10";
/// Nitrogen dioxide concentration column.
pub const COL_NO2: &str = "no2";
/// Ozone concentration column.
pub const COL_OZONE: &str = "ozone";
/// Composite AQI column.
pub const COL_AQI: &str = "aqi";
/// Bus ridership column.
pub const COL_BUS: &str = "bus_passengers";
/// Metro ridership column.
pub const COL_METRO: &str = "metro_passengers";

/// Derived: combined daily ridership.
pub const COL_TOTAL: &str = "total_passengers";
/// Derived: weekday name.
pub const COL_DAY_OF_WEEK: &str = "day_of_week";
/// Derived: Saturday/Sunday flag.
pub const COL_IS_WEEKEND: &str = "is_weekend";
/// Derived: EPA category label.
pub const COL_AQI_CATEGORY: &str = "aqi_category";

/// Columns of the air-quality interchange table, in canonical order.
pub const AQI_TABLE_COLUMNS: [&str; 6] =
    [COL_DATE, COL_PM25, COL_PM10, COL_NO2, COL_OZONE, COL_AQI];

/// Columns of the transport interchange table, in canonical order.
pub const TRANSPORT_TABLE_COLUMNS: [&str; 3] = [COL_DATE, COL_BUS, COL_METRO];

/// Air-quality metric columns participating in correlation pairs.
pub const AQ_METRIC_COLUMNS: [&str; 5] = [COL_AQI, COL_PM25, COL_PM10, COL_NO2, COL_OZONE];

/// Transport metric columns participating in correlation pairs.
pub const TRANSPORT_METRIC_COLUMNS: [&str; 3] = [COL_BUS, COL_METRO, COL_TOTAL];

/// Inclusive lower bound of the AQI scale.
pub const AQI_MIN: f64 = 0.0;
/// Inclusive upper bound of the AQI scale.
pub const AQI_MAX: f64 = 500.0;

/// Verify that every required column is present in `headers`.
///
/// Comparison is exact; the interchange format is case-sensitive.
///
/// # Errors
///
/// Returns [`AeroviaError::MissingColumn`] naming the first absent column.
pub fn require_columns(headers: &[&str], required: &[&str]) -> Result<()> {
    for col in required {
        if !headers.contains(col) {
            return Err(AeroviaError::MissingColumn((*col).to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_columns_accepts_superset() {
        let headers = ["date", "pm25", "pm10", "no2", "ozone", "aqi", "extra"];
        assert!(require_columns(&headers, &AQI_TABLE_COLUMNS).is_ok());
    }

    #[test]
    fn test_require_columns_reports_missing() {
        let headers = ["date", "bus_passengers"];
        let err = require_columns(&headers, &TRANSPORT_TABLE_COLUMNS).unwrap_err();
        assert!(matches!(err, AeroviaError::MissingColumn(ref c) if c == "metro_passengers"));
    }

    #[test]
    fn test_require_columns_is_case_sensitive() {
        let headers = ["Date", "AQI"];
        assert!(require_columns(&headers, &[COL_DATE]).is_err());
    }
}
