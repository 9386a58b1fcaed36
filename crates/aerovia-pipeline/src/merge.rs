//! Inner join of the cleaned air-quality and transport tables.

use aerovia_traits::Result;
use aerovia_traits::types::{AqiRecord, DailyRecord, TimeSeriesTable, TransportRecord};

/// Inner-join two cleaned tables on date.
///
/// Only dates present in both tables survive, so the output length is at
/// most `min(len(aqi), len(transport))` and no date is ever invented.
/// Both inputs are already sorted and duplicate-free, so the join is a
/// single linear two-pointer pass.
///
/// # Errors
///
/// Currently infallible for cleaned inputs; the `Result` mirrors the
/// other pipeline stages.
pub fn merge(
    aqi: &TimeSeriesTable<AqiRecord>,
    transport: &TimeSeriesTable<TransportRecord>,
) -> Result<TimeSeriesTable<DailyRecord>> {
    let mut records = Vec::with_capacity(aqi.len().min(transport.len()));
    let mut right = transport.records().iter().peekable();

    for air in aqi {
        while let Some(t) = right.peek() {
            if t.date < air.date {
                right.next();
            } else {
                break;
            }
        }
        if let Some(t) = right.peek()
            && t.date == air.date
        {
            records.push(DailyRecord {
                date: air.date,
                pm25: air.pm25,
                pm10: air.pm10,
                no2: air.no2,
                ozone: air.ozone,
                aqi: air.aqi,
                bus_passengers: t.bus_passengers,
                metro_passengers: t.metro_passengers,
            });
            right.next();
        }
    }

    TimeSeriesTable::from_records(records)
}
