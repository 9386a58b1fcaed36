//! Synthetic daily AQI series.
//!
//! The model is a seasonal sinusoid plus a weekday adjustment and seeded
//! Gaussian noise:
//!
//! ```text
//! aqi(t) = base
//!        + seasonal_amplitude * sin(2π * (doy(t) - seasonal_phase_days) / 365)
//!        + weekday_adjustment(day_of_week(t))
//!        + noise(seed, t)
//! ```
//!
//! clamped to the AQI scale [0, 500]. Pollutant sub-indices are derived
//! from the day's AQI by fixed proportional mappings plus independent
//! seeded noise, each clamped to its non-negative physical range.

use crate::noise;
use aerovia_traits::schema::{AQI_MAX, AQI_MIN};
use aerovia_traits::types::{AqiRecord, Date, TimeSeriesTable};
use aerovia_traits::{AeroviaError, Result};
use chrono::{Datelike, Duration};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// PM2.5 proportional mapping: `pm25 = 15 + 0.3 * aqi + N(0, 5)`.
pub const PM25_BASE: f64 = 15.0;
/// PM2.5 slope against AQI.
pub const PM25_PER_AQI: f64 = 0.3;
/// PM2.5 noise standard deviation.
pub const PM25_NOISE_STD: f64 = 5.0;

/// PM10 proportional mapping: `pm10 = 25 + 0.4 * aqi + N(0, 8)`.
pub const PM10_BASE: f64 = 25.0;
/// PM10 slope against AQI.
pub const PM10_PER_AQI: f64 = 0.4;
/// PM10 noise standard deviation.
pub const PM10_NOISE_STD: f64 = 8.0;

/// NO2 proportional mapping: `no2 = 20 + 0.2 * aqi + N(0, 6)`.
pub const NO2_BASE: f64 = 20.0;
/// NO2 slope against AQI.
pub const NO2_PER_AQI: f64 = 0.2;
/// NO2 noise standard deviation.
pub const NO2_NOISE_STD: f64 = 6.0;

/// Ozone proportional mapping: `ozone = 30 + 0.25 * aqi + N(0, 7)`.
pub const OZONE_BASE: f64 = 30.0;
/// Ozone slope against AQI.
pub const OZONE_PER_AQI: f64 = 0.25;
/// Ozone noise standard deviation.
pub const OZONE_NOISE_STD: f64 = 7.0;

/// Configuration for the synthetic AQI generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AqiGenConfig {
    /// First date of the window.
    pub start: Date,
    /// Window length in days.
    pub days: usize,
    /// Seed for the noise stream; identical seeds yield identical output.
    pub seed: u64,
    /// Annual mean AQI level.
    pub base: f64,
    /// Amplitude of the annual sinusoid.
    pub seasonal_amplitude: f64,
    /// Day-of-year offset of the seasonal peak.
    pub seasonal_phase_days: f64,
    /// Additive adjustment per weekday, Monday first. Weekends run
    /// cleaner because commuter traffic drops.
    pub weekday_adjustments: [f64; 7],
    /// Standard deviation of the daily noise term.
    pub noise_std: f64,
}

impl Default for AqiGenConfig {
    fn default() -> Self {
        Self {
            start: Date::from_ymd_opt(2024, 1, 1).expect("valid date"),
            days: 90,
            seed: 42,
            base: 50.0,
            seasonal_amplitude: 30.0,
            seasonal_phase_days: 80.0,
            weekday_adjustments: [3.0, 4.0, 4.0, 3.0, 2.0, -5.0, -7.0],
            noise_std: 20.0,
        }
    }
}

impl AqiGenConfig {
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

/// Generate a synthetic AQI series for the configured window.
///
/// The output is a contiguous daily table of exactly `config.days`
/// records starting at `config.start`. Every AQI lies in [0, 500] and
/// every pollutant concentration is non-negative.
///
/// # Errors
///
/// Returns [`AeroviaError::InsufficientData`] for a zero-length window.
pub fn generate_aqi(config: &AqiGenConfig) -> Result<TimeSeriesTable<AqiRecord>> {
    if config.days == 0 {
        return Err(AeroviaError::InsufficientData(
            "generation window must cover at least one day".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut records = Vec::with_capacity(config.days);

    for offset in 0..config.days {
        let date = config.start + Duration::days(offset as i64);
        let doy = f64::from(date.ordinal());
        let weekday = date.weekday().num_days_from_monday() as usize;

        let seasonal = config.seasonal_amplitude
            * (std::f64::consts::TAU * (doy - config.seasonal_phase_days) / 365.0).sin();

        let aqi = (config.base
            + seasonal
            + config.weekday_adjustments[weekday]
            + noise::normal(&mut rng, 0.0, config.noise_std))
        .clamp(AQI_MIN, AQI_MAX);

        // Fixed draw order per day keeps the stream reproducible.
        let pm25 =
            noise::normal(&mut rng, PM25_BASE + PM25_PER_AQI * aqi, PM25_NOISE_STD).max(0.0);
        let pm10 =
            noise::normal(&mut rng, PM10_BASE + PM10_PER_AQI * aqi, PM10_NOISE_STD).max(0.0);
        let no2 = noise::normal(&mut rng, NO2_BASE + NO2_PER_AQI * aqi, NO2_NOISE_STD).max(0.0);
        let ozone =
            noise::normal(&mut rng, OZONE_BASE + OZONE_PER_AQI * aqi, OZONE_NOISE_STD).max(0.0);

        records.push(AqiRecord {
            date,
            pm25,
            pm10,
            no2,
            ozone,
            aqi,
        });
    }

    TimeSeriesTable::from_records(records)
}
