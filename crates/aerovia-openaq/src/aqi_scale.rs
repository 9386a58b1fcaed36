//! US EPA AQI scale conversion.
//!
//! AQI is a piecewise-linear index over pollutant concentration. Only the
//! PM2.5 (24-hour average) table is carried here because PM2.5 is the
//! pollutant the daily index is derived from.

/// EPA PM2.5 breakpoints: `(conc_low, conc_high, index_low, index_high)`.
pub const PM25_BREAKPOINTS: [(f64, f64, f64, f64); 6] = [
    (0.0, 12.0, 0.0, 50.0),      // Good
    (12.1, 35.4, 51.0, 100.0),   // Moderate
    (35.5, 55.4, 101.0, 150.0),  // Unhealthy for sensitive groups
    (55.5, 150.4, 151.0, 200.0), // Unhealthy
    (150.5, 250.4, 201.0, 300.0), // Very unhealthy
    (250.5, 500.4, 301.0, 500.0), // Hazardous
];

/// Convert a 24-hour PM2.5 concentration (µg/m³) to an AQI value.
///
/// Linear interpolation within the matching breakpoint bracket, truncated
/// to a whole index value per the EPA formula. Concentrations in the small
/// gaps between brackets snap up to the next bracket's lower bound, negative
/// readings clamp to zero, and anything above 500.4 µg/m³ reports the
/// scale maximum of 500. A non-finite reading propagates as NaN.
#[must_use]
pub fn aqi_from_pm25(pm25: f64) -> f64 {
    if !pm25.is_finite() {
        return f64::NAN;
    }
    let pm = pm25.max(0.0);
    for &(c_low, c_high, i_low, i_high) in &PM25_BREAKPOINTS {
        if pm <= c_high {
            let c = pm.max(c_low);
            return ((i_high - i_low) / (c_high - c_low) * (c - c_low) + i_low).floor();
        }
    }
    500.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_endpoints() {
        assert_eq!(aqi_from_pm25(0.0), 0.0);
        assert_eq!(aqi_from_pm25(12.0), 50.0);
        assert_eq!(aqi_from_pm25(12.1), 51.0);
        assert_eq!(aqi_from_pm25(35.4), 100.0);
        assert_eq!(aqi_from_pm25(35.5), 101.0);
        assert_eq!(aqi_from_pm25(55.4), 150.0);
        assert_eq!(aqi_from_pm25(150.4), 200.0);
        assert_eq!(aqi_from_pm25(250.4), 300.0);
        assert_eq!(aqi_from_pm25(500.4), 500.0);
    }

    #[test]
    fn test_interior_interpolation() {
        // Midpoint of the Good bracket.
        assert_eq!(aqi_from_pm25(6.0), 25.0);
        // Monotone within and across brackets.
        let mut prev = aqi_from_pm25(0.0);
        for step in 1..=600 {
            let aqi = aqi_from_pm25(f64::from(step));
            assert!(aqi >= prev);
            prev = aqi;
        }
    }

    #[test]
    fn test_out_of_range_inputs() {
        assert_eq!(aqi_from_pm25(-3.0), 0.0);
        assert_eq!(aqi_from_pm25(600.0), 500.0);
        assert!(aqi_from_pm25(f64::NAN).is_nan());
    }

    #[test]
    fn test_gap_snaps_to_next_bracket() {
        // 12.05 sits between the Good and Moderate brackets.
        assert_eq!(aqi_from_pm25(12.05), 51.0);
    }
}
