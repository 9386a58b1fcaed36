//! Cleaning of raw date-indexed tables.
//!
//! Raw rows straight off disk may carry duplicate dates, holes in the
//! calendar, and out-of-domain values. Cleaning normalizes one table at a
//! time: duplicates drop (first occurrence wins), the table is reindexed
//! to its own contiguous calendar range, short gaps are filled from their
//! neighbors, long gaps stay absent, and values are clipped to their
//! domain. The result is a [`TimeSeriesTable`] ready for merging.

use aerovia_traits::Result;
use aerovia_traits::schema::{AQI_MAX, AQI_MIN};
use aerovia_traits::types::{AqiRecord, Date, DatedRecord, TimeSeriesTable, TransportRecord};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cleaning policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanConfig {
    /// Longest run of consecutive missing dates that gets filled by
    /// interpolation. Longer runs are left absent rather than fabricated.
    pub max_gap_fill: usize,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self { max_gap_fill: 2 }
    }
}

/// Clean a raw air-quality table.
///
/// Gaps up to the configured cap fill by linear interpolation between the
/// neighboring days; pollutant concentrations clip at zero and AQI clips
/// to [0, 500].
///
/// # Errors
///
/// Currently infallible for any input; the `Result` mirrors the other
/// pipeline stages.
pub fn clean_aqi(rows: Vec<AqiRecord>, config: &CleanConfig) -> Result<TimeSeriesTable<AqiRecord>> {
    let Some((start, mut slots)) = dedup_and_reindex(rows) else {
        return Ok(TimeSeriesTable::empty());
    };

    fill_gaps(&mut slots, start, config.max_gap_fill, |prev, next, t, date| AqiRecord {
        date,
        pm25: lerp(prev.pm25, next.pm25, t),
        pm10: lerp(prev.pm10, next.pm10, t),
        no2: lerp(prev.no2, next.no2, t),
        ozone: lerp(prev.ozone, next.ozone, t),
        aqi: lerp(prev.aqi, next.aqi, t),
    });

    let records = slots
        .into_iter()
        .flatten()
        .map(|r| AqiRecord {
            pm25: r.pm25.max(0.0),
            pm10: r.pm10.max(0.0),
            no2: r.no2.max(0.0),
            ozone: r.ozone.max(0.0),
            aqi: r.aqi.clamp(AQI_MIN, AQI_MAX),
            ..r
        })
        .collect();
    TimeSeriesTable::from_records(records)
}

/// Clean a raw transport table.
///
/// Counts are discrete, so gaps up to the cap fill from the nearest valid
/// neighbor (the earlier one on a tie) instead of interpolating fractional
/// riders.
///
/// # Errors
///
/// Currently infallible for any input; the `Result` mirrors the other
/// pipeline stages.
pub fn clean_transport(
    rows: Vec<TransportRecord>,
    config: &CleanConfig,
) -> Result<TimeSeriesTable<TransportRecord>> {
    let Some((start, mut slots)) = dedup_and_reindex(rows) else {
        return Ok(TimeSeriesTable::empty());
    };

    fill_gaps(&mut slots, start, config.max_gap_fill, |prev, next, t, date| {
        let nearest = if t <= 0.5 { prev } else { next };
        TransportRecord { date, ..*nearest }
    });

    TimeSeriesTable::from_records(slots.into_iter().flatten().collect())
}

/// Sort, drop duplicate dates keeping the first occurrence, and spread the
/// survivors over the table's own contiguous calendar range. `None` slots
/// mark missing dates. Returns `None` for an empty input.
fn dedup_and_reindex<R: DatedRecord>(mut rows: Vec<R>) -> Option<(Date, Vec<Option<R>>)> {
    let before = rows.len();
    // Stable sort, so equal dates keep input order and dedup keeps the
    // first occurrence.
    rows.sort_by_key(DatedRecord::date);
    rows.dedup_by_key(|r| r.date());
    if before != rows.len() {
        debug!(dropped = before - rows.len(), "dropped duplicate dates");
    }

    let first = rows.first()?.date();
    let last = rows.last()?.date();
    let span = (last - first).num_days() as usize + 1;

    let mut slots: Vec<Option<R>> = vec![None; span];
    for row in rows {
        let index = (row.date() - first).num_days() as usize;
        slots[index] = Some(row);
    }
    Some((first, slots))
}

/// Fill every gap run of length ≤ `cap` using `fill`, which receives the
/// run's two bounding records, the position `t ∈ (0, 1)` of the missing
/// day between them, and the missing date itself. The first and last
/// slots are occupied by construction, so every run is interior.
fn fill_gaps<R, F>(slots: &mut [Option<R>], start: Date, cap: usize, fill: F)
where
    R: DatedRecord,
    F: Fn(&R, &R, f64, Date) -> R,
{
    let mut i = 1;
    while i < slots.len() {
        if slots[i].is_some() {
            i += 1;
            continue;
        }
        let run_start = i;
        while slots[i].is_none() {
            i += 1;
        }
        let run_len = i - run_start;
        if run_len > cap {
            debug!(run_len, cap, "gap exceeds fill cap; leaving dates absent");
            continue;
        }
        let (Some(prev), Some(next)) = (slots[run_start - 1].clone(), slots[i].clone()) else {
            continue;
        };
        for k in run_start..i {
            let t = (k - run_start + 1) as f64 / (run_len + 1) as f64;
            let date = start + Duration::days(k as i64);
            slots[k] = Some(fill(&prev, &next, t, date));
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn aqi_row(date: Date, aqi: f64) -> AqiRecord {
        AqiRecord {
            date,
            pm25: aqi * 0.3,
            pm10: aqi * 0.4,
            no2: aqi * 0.2,
            ozone: aqi * 0.25,
            aqi,
        }
    }

    #[test]
    fn test_empty_input_yields_empty_table() {
        let table = clean_aqi(Vec::new(), &CleanConfig::default()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_dates_keep_first_occurrence() {
        let rows = vec![
            aqi_row(d(2024, 1, 2), 60.0),
            aqi_row(d(2024, 1, 1), 40.0),
            aqi_row(d(2024, 1, 2), 99.0),
        ];
        let table = clean_aqi(rows, &CleanConfig::default()).unwrap();
        assert_eq!(table.len(), 2);
        assert_relative_eq!(table.get(d(2024, 1, 2)).unwrap().aqi, 60.0);
    }

    #[test]
    fn test_single_gap_interpolates_linearly() {
        // 2024-02-05 missing, cap 1.
        let rows = vec![
            aqi_row(d(2024, 2, 4), 40.0),
            aqi_row(d(2024, 2, 6), 60.0),
        ];
        let table = clean_aqi(rows, &CleanConfig { max_gap_fill: 1 }).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.is_contiguous());
        let filled = table.get(d(2024, 2, 5)).unwrap();
        assert_relative_eq!(filled.aqi, 50.0);
        assert_relative_eq!(filled.pm25, 15.0);
    }

    #[test]
    fn test_gap_beyond_cap_stays_absent() {
        let rows = vec![
            aqi_row(d(2024, 2, 4), 40.0),
            aqi_row(d(2024, 2, 6), 60.0),
        ];
        let table = clean_aqi(rows, &CleanConfig { max_gap_fill: 0 }).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.get(d(2024, 2, 5)).is_none());
        assert!(!table.is_contiguous());
    }

    #[test]
    fn test_two_day_gap_interpolates_at_thirds() {
        let rows = vec![
            aqi_row(d(2024, 1, 1), 30.0),
            aqi_row(d(2024, 1, 4), 60.0),
        ];
        let table = clean_aqi(rows, &CleanConfig { max_gap_fill: 2 }).unwrap();
        assert_relative_eq!(table.get(d(2024, 1, 2)).unwrap().aqi, 40.0);
        assert_relative_eq!(table.get(d(2024, 1, 3)).unwrap().aqi, 50.0);
    }

    #[test]
    fn test_out_of_domain_values_clip() {
        let mut high = aqi_row(d(2024, 1, 1), 800.0);
        high.pm25 = -4.0;
        let table = clean_aqi(vec![high], &CleanConfig::default()).unwrap();
        let rec = table.get(d(2024, 1, 1)).unwrap();
        assert_relative_eq!(rec.aqi, 500.0);
        assert_relative_eq!(rec.pm25, 0.0);
    }

    #[test]
    fn test_transport_gap_fills_from_nearest_neighbor() {
        let rows = vec![
            TransportRecord {
                date: d(2024, 1, 1),
                bus_passengers: 100,
                metro_passengers: 200,
            },
            TransportRecord {
                date: d(2024, 1, 4),
                bus_passengers: 400,
                metro_passengers: 800,
            },
        ];
        let table = clean_transport(rows, &CleanConfig { max_gap_fill: 2 }).unwrap();
        // Jan 2 is nearer the Jan 1 record, Jan 3 nearer Jan 4.
        assert_eq!(table.get(d(2024, 1, 2)).unwrap().bus_passengers, 100);
        assert_eq!(table.get(d(2024, 1, 3)).unwrap().bus_passengers, 400);
    }

    #[test]
    fn test_transport_tie_prefers_earlier_neighbor() {
        let rows = vec![
            TransportRecord {
                date: d(2024, 1, 1),
                bus_passengers: 100,
                metro_passengers: 200,
            },
            TransportRecord {
                date: d(2024, 1, 3),
                bus_passengers: 300,
                metro_passengers: 600,
            },
        ];
        let table = clean_transport(rows, &CleanConfig { max_gap_fill: 1 }).unwrap();
        assert_eq!(table.get(d(2024, 1, 2)).unwrap().metro_passengers, 200);
    }
}
