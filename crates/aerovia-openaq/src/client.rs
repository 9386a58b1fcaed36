//! OpenAQ API client implementation.

use crate::{
    Result,
    aqi_scale,
    error::OpenAqError,
    types::{Measurement, MeasurementsResponse, Parameter},
};
use aerovia_traits::types::{AqiRecord, Date, TimeSeriesTable};
use chrono::Duration;
use reqwest::Client;
use std::collections::BTreeMap;
use std::env;

/// Base URL for the OpenAQ API.
const OPENAQ_BASE_URL: &str = "https://api.openaq.org/v2";

/// Page size for measurement queries; one page covers a 90-day window of
/// hourly readings with room to spare.
const PAGE_LIMIT: u32 = 10_000;

/// OpenAQ API client.
#[derive(Debug, Clone)]
pub struct OpenAqClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Default for OpenAqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenAqClient {
    /// Create a client against the public API without an API key.
    ///
    /// Anonymous access works but is rate-limited more aggressively.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: OPENAQ_BASE_URL.to_string(),
            api_key: None,
        }
    }

    /// Create a client with an API key.
    #[must_use]
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::new()
        }
    }

    /// Create a client against a different base URL, such as a local
    /// test server.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::new()
        }
    }

    /// Create a client from the environment.
    ///
    /// This will also load from a `.env` file if present. `OPENAQ_API_KEY`
    /// supplies the optional key and `AEROVIA_OPENAQ_URL` overrides the
    /// base URL, which the tests use to point at a local server.
    #[must_use]
    pub fn from_env() -> Self {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mut client = Self::new();
        if let Ok(url) = env::var("AEROVIA_OPENAQ_URL") {
            client.base_url = url;
        }
        client.api_key = env::var("OPENAQ_API_KEY").ok();
        client
    }

    /// Build a full URL for an endpoint.
    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-Key", key);
        }
        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OpenAqError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(OpenAqError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch raw measurements for one pollutant at one location.
    ///
    /// # Arguments
    ///
    /// * `location_id` - OpenAQ numeric location identifier
    /// * `parameter` - Pollutant to query
    /// * `from` / `to` - Inclusive date range
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn measurements(
        &self,
        location_id: &str,
        parameter: Parameter,
        from: Date,
        to: Date,
    ) -> Result<Vec<Measurement>> {
        let endpoint = format!(
            "measurements?location_id={location_id}&parameter={}&date_from={from}&date_to={to}&limit={PAGE_LIMIT}&order_by=datetime&sort=asc",
            parameter.as_str()
        );
        let response: MeasurementsResponse = self.get(&endpoint).await?;
        Ok(response.results)
    }

    /// Fetch and assemble a complete daily air-quality series.
    ///
    /// All four pollutants are queried in parallel, raw readings are
    /// averaged per calendar day, and the daily AQI is derived from the
    /// PM2.5 average via the EPA scale. A day missing any pollutant is
    /// dropped; the window must come back whole.
    ///
    /// # Errors
    ///
    /// Returns [`OpenAqError::NoData`] when nothing usable came back and
    /// [`OpenAqError::IncompleteWindow`] when the assembled series does
    /// not cover every requested day.
    pub async fn daily_series(
        &self,
        location_id: &str,
        start: Date,
        days: usize,
    ) -> Result<TimeSeriesTable<AqiRecord>> {
        let end = start + Duration::days(days as i64 - 1);
        let [p_pm25, p_pm10, p_no2, p_o3] = Parameter::ALL;
        let (pm25, pm10, no2, o3) = tokio::join!(
            self.measurements(location_id, p_pm25, start, end),
            self.measurements(location_id, p_pm10, start, end),
            self.measurements(location_id, p_no2, start, end),
            self.measurements(location_id, p_o3, start, end),
        );

        let records = assemble_daily(&pm25?, &pm10?, &no2?, &o3?, start, end);
        if records.is_empty() {
            return Err(OpenAqError::NoData(location_id.to_string()));
        }
        if records.len() < days {
            return Err(OpenAqError::IncompleteWindow {
                expected: days,
                received: records.len(),
            });
        }

        TimeSeriesTable::from_records(records).map_err(|e| OpenAqError::Api(e.to_string()))
    }
}

/// Average raw readings per calendar day, skipping non-finite values.
fn daily_means(measurements: &[Measurement]) -> BTreeMap<Date, f64> {
    let mut sums: BTreeMap<Date, (f64, u32)> = BTreeMap::new();
    for m in measurements {
        if let Some(date) = m.parsed_date()
            && m.value.is_finite()
        {
            let entry = sums.entry(date).or_insert((0.0, 0));
            entry.0 += m.value;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(date, (sum, n))| (date, sum / f64::from(n)))
        .collect()
}

/// Join the four per-pollutant daily means into records, keeping only
/// days inside the window where every pollutant reported.
fn assemble_daily(
    pm25: &[Measurement],
    pm10: &[Measurement],
    no2: &[Measurement],
    o3: &[Measurement],
    start: Date,
    end: Date,
) -> Vec<AqiRecord> {
    let pm25 = daily_means(pm25);
    let pm10 = daily_means(pm10);
    let no2 = daily_means(no2);
    let o3 = daily_means(o3);

    pm25.iter()
        .filter(|(date, _)| (start..=end).contains(*date))
        .filter_map(|(&date, &pm25_mean)| {
            Some(AqiRecord {
                date,
                pm25: pm25_mean,
                pm10: *pm10.get(&date)?,
                no2: *no2.get(&date)?,
                ozone: *o3.get(&date)?,
                aqi: aqi_scale::aqi_from_pm25(pm25_mean),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MeasurementDate;

    fn reading(utc: &str, parameter: Parameter, value: f64) -> Measurement {
        Measurement {
            date: MeasurementDate {
                utc: utc.to_string(),
                local: String::new(),
            },
            parameter: parameter.as_str().to_string(),
            value,
            unit: String::new(),
            location: "station-1".to_string(),
        }
    }

    #[test]
    fn test_url_building() {
        let client = OpenAqClient::new();
        assert_eq!(
            client.url("locations?country=US"),
            "https://api.openaq.org/v2/locations?country=US"
        );
    }

    #[test]
    fn test_daily_means_averages_within_a_day() {
        let readings = vec![
            reading("2024-01-01T06:00:00+00:00", Parameter::Pm25, 10.0),
            reading("2024-01-01T18:00:00+00:00", Parameter::Pm25, 14.0),
            reading("2024-01-02T06:00:00+00:00", Parameter::Pm25, 30.0),
            reading("2024-01-02T18:00:00+00:00", Parameter::Pm25, f64::NAN),
        ];
        let means = daily_means(&readings);
        assert_eq!(means[&Date::from_ymd_opt(2024, 1, 1).unwrap()], 12.0);
        assert_eq!(means[&Date::from_ymd_opt(2024, 1, 2).unwrap()], 30.0);
    }

    #[test]
    fn test_assemble_drops_days_missing_a_pollutant() {
        let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
        let end = Date::from_ymd_opt(2024, 1, 2).unwrap();
        let pm25 = vec![
            reading("2024-01-01T12:00:00+00:00", Parameter::Pm25, 10.0),
            reading("2024-01-02T12:00:00+00:00", Parameter::Pm25, 20.0),
        ];
        let pm10 = vec![
            reading("2024-01-01T12:00:00+00:00", Parameter::Pm10, 22.0),
            reading("2024-01-02T12:00:00+00:00", Parameter::Pm10, 24.0),
        ];
        let no2 = vec![reading("2024-01-01T12:00:00+00:00", Parameter::No2, 18.0)];
        let o3 = vec![
            reading("2024-01-01T12:00:00+00:00", Parameter::O3, 31.0),
            reading("2024-01-02T12:00:00+00:00", Parameter::O3, 33.0),
        ];

        let records = assemble_daily(&pm25, &pm10, &no2, &o3, start, end);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, start);
        assert_eq!(records[0].aqi, aqi_scale::aqi_from_pm25(10.0));
    }

    #[test]
    fn test_assemble_ignores_days_outside_window() {
        let start = Date::from_ymd_opt(2024, 1, 2).unwrap();
        let all = |utc: &str, value: f64| {
            [
                reading(utc, Parameter::Pm25, value),
                reading(utc, Parameter::Pm10, value),
                reading(utc, Parameter::No2, value),
                reading(utc, Parameter::O3, value),
            ]
        };
        let [pm25a, pm10a, no2a, o3a] = all("2024-01-01T12:00:00+00:00", 5.0);
        let [pm25b, pm10b, no2b, o3b] = all("2024-01-02T12:00:00+00:00", 6.0);

        let records = assemble_daily(
            &[pm25a, pm25b],
            &[pm10a, pm10b],
            &[no2a, no2b],
            &[o3a, o3b],
            start,
            start,
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, start);
    }
}
