//! Data types for OpenAQ API responses.

use aerovia_traits::types::Date;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Pollutant parameters the client queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parameter {
    /// Fine particulate matter (µg/m³, 24h average).
    #[default]
    Pm25,
    /// Coarse particulate matter (µg/m³).
    Pm10,
    /// Nitrogen dioxide (ppb).
    No2,
    /// Ground-level ozone (ppb).
    O3,
}

impl Parameter {
    /// All parameters needed to assemble a daily air-quality record.
    pub const ALL: [Self; 4] = [Self::Pm25, Self::Pm10, Self::No2, Self::O3];

    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pm25 => "pm25",
            Self::Pm10 => "pm10",
            Self::No2 => "no2",
            Self::O3 => "o3",
        }
    }
}

/// Envelope around a measurements query response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementsResponse {
    /// Individual measurements, ordered as requested.
    #[serde(default)]
    pub results: Vec<Measurement>,
}

/// One raw measurement from a monitoring station.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    /// Timestamp of the reading.
    pub date: MeasurementDate,
    /// Pollutant parameter name (e.g. "pm25").
    pub parameter: String,
    /// Measured concentration.
    pub value: f64,
    /// Concentration unit reported by the station.
    #[serde(default)]
    pub unit: String,
    /// Station name.
    #[serde(default)]
    pub location: String,
}

impl Measurement {
    /// Parse the UTC timestamp into a calendar date.
    #[must_use]
    pub fn parsed_date(&self) -> Option<Date> {
        DateTime::parse_from_rfc3339(&self.date.utc)
            .map(|dt| dt.date_naive())
            .ok()
            .or_else(|| Date::parse_from_str(self.date.utc.get(..10)?, "%Y-%m-%d").ok())
    }
}

/// Timestamp pair as OpenAQ reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementDate {
    /// UTC timestamp, RFC 3339.
    pub utc: String,
    /// Station-local timestamp.
    #[serde(default)]
    pub local: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_strings() {
        assert_eq!(Parameter::Pm25.as_str(), "pm25");
        assert_eq!(Parameter::O3.as_str(), "o3");
        assert_eq!(Parameter::ALL.len(), 4);
    }

    #[test]
    fn test_parsed_date_rfc3339() {
        let m = Measurement {
            date: MeasurementDate {
                utc: "2024-01-15T08:00:00+00:00".to_string(),
                local: String::new(),
            },
            parameter: "pm25".to_string(),
            value: 12.5,
            unit: "µg/m³".to_string(),
            location: "downtown".to_string(),
        };
        assert_eq!(m.parsed_date(), Date::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_parsed_date_bare_date_fallback() {
        let m = Measurement {
            date: MeasurementDate {
                utc: "2024-01-15".to_string(),
                local: String::new(),
            },
            parameter: "pm25".to_string(),
            value: 12.5,
            unit: String::new(),
            location: String::new(),
        };
        assert_eq!(m.parsed_date(), Date::from_ymd_opt(2024, 1, 15));
    }
}
