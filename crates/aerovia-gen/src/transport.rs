//! Synthetic daily ridership series, coupled to an AQI series.
//!
//! Per mode the model is multiplicative:
//!
//! ```text
//! ridership(t) = base * weekday_multiplier(day_of_week(t))
//!              * seasonal_factor(t)
//!              * aqi_penalty(aqi(t))
//!              * (1 + noise(seed, t))
//! ```
//!
//! rounded and clamped to a non-negative integer. The AQI penalty is the
//! signal the statistics engine recovers later, so its functional form
//! and constants are explicit: see [`AqiPenalty`]. Bus runs lower volume
//! with higher relative variance than metro.

use crate::noise;
use aerovia_traits::types::{AqiRecord, Date, TimeSeriesTable, TransportRecord};
use aerovia_traits::{AeroviaError, Result};
use chrono::{Datelike, Duration};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Ridership reduction applied above an AQI threshold.
///
/// Below `threshold` the factor is exactly 1.0. Above it the factor
/// falls linearly by `per_point` for every AQI point, floored at
/// `1 - max_reduction`, so it is monotonically non-increasing in AQI.
///
/// Defaults: threshold 100 (the Good/Moderate boundary's upper edge),
/// 0.2% ridership lost per AQI point, capped at a 60% total reduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AqiPenalty {
    /// AQI level above which avoidance behavior begins.
    pub threshold: f64,
    /// Fractional ridership lost per AQI point above the threshold.
    pub per_point: f64,
    /// Maximum total fractional reduction, however bad the air gets.
    pub max_reduction: f64,
}

impl Default for AqiPenalty {
    fn default() -> Self {
        Self {
            threshold: 100.0,
            per_point: 0.002,
            max_reduction: 0.6,
        }
    }
}

impl AqiPenalty {
    /// Multiplicative ridership factor for a given AQI.
    #[must_use]
    pub fn factor(&self, aqi: f64) -> f64 {
        if aqi <= self.threshold {
            1.0
        } else {
            (1.0 - self.per_point * (aqi - self.threshold)).max(1.0 - self.max_reduction)
        }
    }
}

/// Configuration for the synthetic ridership generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportGenConfig {
    /// First date of the window.
    pub start: Date,
    /// Window length in days.
    pub days: usize,
    /// Seed for the noise stream; identical seeds yield identical output.
    pub seed: u64,
    /// Mean weekday bus boardings.
    pub bus_base: f64,
    /// Mean weekday metro boardings.
    pub metro_base: f64,
    /// Relative noise std for bus (higher: smaller fleet, lumpier demand).
    pub bus_noise: f64,
    /// Relative noise std for metro.
    pub metro_noise: f64,
    /// Multiplier per weekday, Monday first; weekends well below 1.
    pub weekday_multipliers: [f64; 7],
    /// Amplitude of the annual seasonal factor `1 + a * sin(...)`.
    pub seasonal_amplitude: f64,
    /// Day-of-year offset of the seasonal peak.
    pub seasonal_phase_days: f64,
    /// Ridership penalty applied above the AQI threshold.
    pub aqi_penalty: AqiPenalty,
}

impl Default for TransportGenConfig {
    fn default() -> Self {
        Self {
            start: Date::from_ymd_opt(2024, 1, 1).expect("valid date"),
            days: 90,
            seed: 42,
            bus_base: 15_000.0,
            metro_base: 25_000.0,
            bus_noise: 0.15,
            metro_noise: 0.08,
            weekday_multipliers: [1.0, 1.04, 1.06, 1.03, 0.98, 0.58, 0.52],
            seasonal_amplitude: 0.3,
            seasonal_phase_days: 80.0,
            aqi_penalty: AqiPenalty::default(),
        }
    }
}

impl TransportGenConfig {
    /// Convenience constructor for the three window parameters, keeping
    /// the model constants at their defaults.
    #[must_use]
    pub fn new(start: Date, days: usize, seed: u64) -> Self {
        Self {
            start,
            days,
            seed,
            ..Self::default()
        }
    }
}

/// Generate a synthetic ridership series over the configured window.
///
/// The AQI table supplies the value fed to the penalty function for
/// each day, so it must cover the whole window.
///
/// # Errors
///
/// Returns [`AeroviaError::InsufficientData`] for a zero-length window
/// or when the AQI table is missing a date inside the window.
pub fn generate_transport(
    config: &TransportGenConfig,
    aqi: &TimeSeriesTable<AqiRecord>,
) -> Result<TimeSeriesTable<TransportRecord>> {
    if config.days == 0 {
        return Err(AeroviaError::InsufficientData(
            "generation window must cover at least one day".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.days);

    for offset in 0..config.days {
        let date = config.start + Duration::days(offset as i64);
        let aqi_value = aqi
            .get(date)
            .map(|r| r.aqi)
            .ok_or_else(|| {
                AeroviaError::InsufficientData(format!("AQI table has no record for {date}"))
            })?;

        let doy = f64::from(date.ordinal());
        let weekday = date.weekday().num_days_from_monday() as usize;

        let seasonal = 1.0
            + config.seasonal_amplitude
                * (std::f64::consts::TAU * (doy - config.seasonal_phase_days) / 365.0).sin();
        let shared = config.weekday_multipliers[weekday]
            * seasonal
            * config.aqi_penalty.factor(aqi_value);

        let bus = config.bus_base * shared * (1.0 + noise::normal(&mut rng, 0.0, config.bus_noise));
        let metro =
            config.metro_base * shared * (1.0 + noise::normal(&mut rng, 0.0, config.metro_noise));

        records.push(TransportRecord {
            date,
            bus_passengers: to_count(bus),
            metro_passengers: to_count(metro),
        });
    }

    TimeSeriesTable::from_records(records)
}

/// Round to the nearest rider and clamp at zero.
fn to_count(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi::{AqiGenConfig, generate_aqi};

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd_opt(y, m, day).unwrap()
    }

    fn flat_aqi(start: Date, days: usize, level: f64) -> TimeSeriesTable<AqiRecord> {
        let records = (0..days)
            .map(|i| AqiRecord {
                date: start + Duration::days(i as i64),
                pm25: 10.0,
                pm10: 20.0,
                no2: 15.0,
                ozone: 25.0,
                aqi: level,
            })
            .collect();
        TimeSeriesTable::from_records(records).unwrap()
    }

    #[test]
    fn test_window_shape_and_domain() {
        let aqi = generate_aqi(&AqiGenConfig::new(d(2024, 1, 1), 90, 42)).unwrap();
        let config = TransportGenConfig::new(d(2024, 1, 1), 90, 42);
        let table = generate_transport(&config, &aqi).unwrap();

        assert_eq!(table.len(), 90);
        assert!(table.is_contiguous());
        assert_eq!(table.first_date(), Some(d(2024, 1, 1)));
    }

    #[test]
    fn test_determinism() {
        let aqi = generate_aqi(&AqiGenConfig::new(d(2024, 1, 1), 60, 9)).unwrap();
        let config = TransportGenConfig::new(d(2024, 1, 1), 60, 9);
        let a = generate_transport(&config, &aqi).unwrap();
        let b = generate_transport(&config, &aqi).unwrap();
        assert_eq!(a.records(), b.records());
    }

    #[test]
    fn test_missing_aqi_date_is_an_error() {
        let aqi = flat_aqi(d(2024, 1, 1), 5, 50.0);
        let config = TransportGenConfig::new(d(2024, 1, 1), 10, 1);
        assert!(generate_transport(&config, &aqi).is_err());
    }

    #[test]
    fn test_penalty_is_monotone_non_increasing() {
        let penalty = AqiPenalty::default();
        let mut prev = penalty.factor(0.0);
        for step in 0..100 {
            let factor = penalty.factor(f64::from(step) * 5.0);
            assert!(factor <= prev + 1e-12);
            assert!(factor >= 1.0 - penalty.max_reduction);
            prev = factor;
        }
        assert_eq!(penalty.factor(100.0), 1.0);
        assert!(penalty.factor(101.0) < 1.0);
    }

    #[test]
    fn test_spike_week_depresses_ridership() {
        // Two weeks, identical weekday composition, Monday-aligned start;
        // noise disabled so the penalty is the only difference.
        let start = d(2024, 1, 1);
        let mut records = flat_aqi(start, 7, 300.0).into_records();
        records.extend(flat_aqi(start + Duration::days(7), 7, 50.0).into_records());
        let aqi = TimeSeriesTable::from_records(records).unwrap();

        let config = TransportGenConfig {
            bus_noise: 0.0,
            metro_noise: 0.0,
            ..TransportGenConfig::new(start, 14, 42)
        };
        let table = generate_transport(&config, &aqi).unwrap();

        let week_mean = |from: usize| -> f64 {
            table.records()[from..from + 7]
                .iter()
                .map(|r| f64::from(r.bus_passengers + r.metro_passengers))
                .sum::<f64>()
                / 7.0
        };

        assert!(week_mean(0) < week_mean(7));
    }

    #[test]
    fn test_bus_has_higher_relative_variance() {
        let aqi = flat_aqi(d(2024, 1, 1), 365, 50.0);
        let config = TransportGenConfig {
            seasonal_amplitude: 0.0,
            ..TransportGenConfig::new(d(2024, 1, 1), 365, 11)
        };
        let table = generate_transport(&config, &aqi).unwrap();

        // Weekdays only so the weekday multipliers do not dominate.
        let relative_std = |extract: fn(&TransportRecord) -> f64| -> f64 {
            let vals: Vec<f64> = table
                .iter()
                .filter(|r| r.date.weekday().num_days_from_monday() == 2)
                .map(extract)
                .collect();
            let mean = vals.iter().sum::<f64>() / vals.len() as f64;
            let var = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (vals.len() - 1) as f64;
            var.sqrt() / mean
        };

        let bus_rel = relative_std(|r| f64::from(r.bus_passengers));
        let metro_rel = relative_std(|r| f64::from(r.metro_passengers));
        assert!(bus_rel > metro_rel);
    }
}
