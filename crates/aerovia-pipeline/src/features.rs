//! Feature engineering over the merged daily table.
//!
//! A pure transform: the input table is borrowed, never modified, and the
//! output [`FeatureTable`] carries the base columns plus calendar
//! features, the AQI category label, and lag / rolling-mean columns for
//! every numeric metric. Rows without enough history for a lag or rolling
//! window carry a null, never a fabricated value.

use aerovia_traits::Result;
use aerovia_traits::schema::{
    COL_AQI, COL_AQI_CATEGORY, COL_BUS, COL_DATE, COL_DAY_OF_WEEK, COL_IS_WEEKEND, COL_METRO,
    COL_NO2, COL_OZONE, COL_PM10, COL_PM25, COL_TOTAL,
};
use aerovia_traits::types::{AqiCategory, DailyRecord, FeatureTable, TimeSeriesTable};
use chrono::Datelike;
use polars::prelude::*;

/// Lag offsets, in days, derived for every numeric column.
pub const LAG_DAYS: [usize; 3] = [1, 3, 7];

/// Rolling-mean window sizes, in days, derived for every numeric column.
pub const ROLLING_WINDOWS: [usize; 2] = [3, 7];

/// Name of the lag column derived from `base`.
#[must_use]
pub fn lag_column(base: &str, days: usize) -> String {
    format!("{base}_lag_{days}")
}

/// Name of the rolling-mean column derived from `base`.
#[must_use]
pub fn rolling_column(base: &str, window: usize) -> String {
    format!("{base}_rolling_{window}d")
}

/// Derive the feature table from a merged daily table.
///
/// Adds, per row: ISO date string, weekday name, weekend flag, total
/// ridership, the EPA category label, and for each numeric column the
/// [`LAG_DAYS`] lags and [`ROLLING_WINDOWS`] rolling means. Rolling means
/// require a full window; shorter history yields a null.
///
/// # Errors
///
/// Returns a Polars error if DataFrame assembly fails.
pub fn engineer_features(table: &TimeSeriesTable<DailyRecord>) -> Result<FeatureTable> {
    let n = table.len();

    let mut dates = Vec::with_capacity(n);
    let mut weekdays = Vec::with_capacity(n);
    let mut weekends = Vec::with_capacity(n);
    let mut categories = Vec::with_capacity(n);
    for rec in table {
        dates.push(rec.date.format("%Y-%m-%d").to_string());
        weekdays.push(rec.date.format("%A").to_string());
        weekends.push(rec.date.weekday().num_days_from_monday() >= 5);
        categories.push(AqiCategory::from_aqi(rec.aqi).label().to_string());
    }

    let numeric: [(&str, Vec<f64>); 8] = [
        (COL_PM25, table.iter().map(|r| r.pm25).collect()),
        (COL_PM10, table.iter().map(|r| r.pm10).collect()),
        (COL_NO2, table.iter().map(|r| r.no2).collect()),
        (COL_OZONE, table.iter().map(|r| r.ozone).collect()),
        (COL_AQI, table.iter().map(|r| r.aqi).collect()),
        (COL_BUS, table.iter().map(|r| f64::from(r.bus_passengers)).collect()),
        (COL_METRO, table.iter().map(|r| f64::from(r.metro_passengers)).collect()),
        (
            COL_TOTAL,
            table
                .iter()
                .map(|r| f64::from(r.bus_passengers) + f64::from(r.metro_passengers))
                .collect(),
        ),
    ];

    let mut columns: Vec<Column> = Vec::with_capacity(
        4 + numeric.len() * (1 + LAG_DAYS.len() + ROLLING_WINDOWS.len()),
    );
    columns.push(Column::new(COL_DATE.into(), dates));
    for (name, values) in &numeric {
        columns.push(Column::new((*name).into(), values.as_slice()));
    }
    columns.push(Column::new(COL_DAY_OF_WEEK.into(), weekdays));
    columns.push(Column::new(COL_IS_WEEKEND.into(), weekends));
    columns.push(Column::new(COL_AQI_CATEGORY.into(), categories));

    for (name, values) in &numeric {
        for days in LAG_DAYS {
            columns.push(Column::new(
                lag_column(name, days).into(),
                lag(values, days),
            ));
        }
        for window in ROLLING_WINDOWS {
            columns.push(Column::new(
                rolling_column(name, window).into(),
                rolling_mean(values, window),
            ));
        }
    }

    Ok(FeatureTable::new(DataFrame::new(columns)?))
}

/// Shift values forward by `days`; the first `days` entries are null.
fn lag(values: &[f64], days: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| i.checked_sub(days).map(|j| values[j]))
        .collect()
}

/// Trailing mean over a full window; entries with fewer than `window`
/// preceding values (inclusive) are null.
fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for i in 0..values.len() {
        sum += values[i];
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / window as f64));
        } else {
            out.push(None);
        }
    }
    out
}
