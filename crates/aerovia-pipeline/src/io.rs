//! CSV interchange for the raw table schemas.
//!
//! Reads are forgiving at the row level and strict at the schema level: a
//! missing required column fails the whole load, while an unparsable row
//! is skipped and reported in the [`LoadReport`] with its index and the
//! offending column. Count columns saturate into the valid domain as rows
//! materialize; real-valued clipping is the cleaning stage's job.

use aerovia_traits::schema::{AQI_TABLE_COLUMNS, TRANSPORT_TABLE_COLUMNS, require_columns};
use aerovia_traits::types::{AqiRecord, Date, TimeSeriesTable, TransportRecord};
use aerovia_traits::{AeroviaError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::warn;

/// Outcome of a CSV load.
///
/// `rows_read` counts every data row encountered, including the ones that
/// were skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Total data rows encountered.
    pub rows_read: usize,
    /// Rows that failed to parse and were skipped.
    pub skipped: Vec<SkippedRow>,
}

/// One row that failed to parse during a load.
#[derive(Debug, Clone)]
pub struct SkippedRow {
    /// Zero-based data-row index.
    pub row: usize,
    /// Offending column, when the parser can attribute the defect.
    pub column: String,
    /// Parser message.
    pub message: String,
}

impl SkippedRow {
    /// The defect as a row-level validation error.
    #[must_use]
    pub fn to_error(&self) -> AeroviaError {
        AeroviaError::Validation {
            row: self.row,
            column: self.column.clone(),
            message: self.message.clone(),
        }
    }
}

/// Transport row as it appears on disk. Counts are read as wide signed
/// integers so an out-of-domain value saturates instead of killing the
/// row.
#[derive(Debug, Deserialize)]
struct RawTransportRow {
    date: Date,
    bus_passengers: i64,
    metro_passengers: i64,
}

impl From<RawTransportRow> for TransportRecord {
    fn from(raw: RawTransportRow) -> Self {
        Self {
            date: raw.date,
            bus_passengers: saturate(raw.bus_passengers),
            metro_passengers: saturate(raw.metro_passengers),
        }
    }
}

fn saturate(count: i64) -> u32 {
    count.clamp(0, i64::from(u32::MAX)) as u32
}

/// Read a raw air-quality table.
///
/// Output rows are in file order and may contain duplicates or gaps; they
/// go through the cleaner before becoming a table.
///
/// # Errors
///
/// Returns [`AeroviaError::MissingColumn`] when a required column is
/// absent from the header.
pub fn read_aqi<R: Read>(reader: R) -> Result<(Vec<AqiRecord>, LoadReport)> {
    read_rows(reader, &AQI_TABLE_COLUMNS)
}

/// Read a raw transport table. See [`read_aqi`].
///
/// # Errors
///
/// Returns [`AeroviaError::MissingColumn`] when a required column is
/// absent from the header.
pub fn read_transport<R: Read>(reader: R) -> Result<(Vec<TransportRecord>, LoadReport)> {
    let (raw, report): (Vec<RawTransportRow>, _) = read_rows(reader, &TRANSPORT_TABLE_COLUMNS)?;
    Ok((raw.into_iter().map(TransportRecord::from).collect(), report))
}

/// Read a raw air-quality table from a file path.
///
/// # Errors
///
/// Returns an error when the file cannot be opened or the header is
/// structurally invalid.
pub fn read_aqi_file(path: impl AsRef<Path>) -> Result<(Vec<AqiRecord>, LoadReport)> {
    read_aqi(open(path.as_ref())?)
}

/// Read a raw transport table from a file path.
///
/// # Errors
///
/// Returns an error when the file cannot be opened or the header is
/// structurally invalid.
pub fn read_transport_file(path: impl AsRef<Path>) -> Result<(Vec<TransportRecord>, LoadReport)> {
    read_transport(open(path.as_ref())?)
}

/// Write an air-quality table as CSV.
///
/// # Errors
///
/// Returns an error when serialization or the underlying writer fails.
pub fn write_aqi<W: Write>(writer: W, table: &TimeSeriesTable<AqiRecord>) -> Result<()> {
    write_rows(writer, table.records())
}

/// Write a transport table as CSV.
///
/// # Errors
///
/// Returns an error when serialization or the underlying writer fails.
pub fn write_transport<W: Write>(writer: W, table: &TimeSeriesTable<TransportRecord>) -> Result<()> {
    write_rows(writer, table.records())
}

/// Write an air-quality table to a file path.
///
/// # Errors
///
/// Returns an error when the file cannot be created or a write fails.
pub fn write_aqi_file(path: impl AsRef<Path>, table: &TimeSeriesTable<AqiRecord>) -> Result<()> {
    write_aqi(create(path.as_ref())?, table)
}

/// Write a transport table to a file path.
///
/// # Errors
///
/// Returns an error when the file cannot be created or a write fails.
pub fn write_transport_file(
    path: impl AsRef<Path>,
    table: &TimeSeriesTable<TransportRecord>,
) -> Result<()> {
    write_transport(create(path.as_ref())?, table)
}

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|e| AeroviaError::Other(format!("cannot open {}: {e}", path.display())))
}

fn create(path: &Path) -> Result<File> {
    File::create(path)
        .map_err(|e| AeroviaError::Other(format!("cannot create {}: {e}", path.display())))
}

fn read_rows<T: DeserializeOwned, R: Read>(
    reader: R,
    required: &[&str],
) -> Result<(Vec<T>, LoadReport)> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|e| AeroviaError::InvalidData(format!("unreadable CSV header: {e}")))?
        .clone();
    let header_names: Vec<&str> = headers.iter().collect();
    require_columns(&header_names, required)?;

    let mut rows = Vec::new();
    let mut report = LoadReport::default();
    for (index, result) in rdr.deserialize::<T>().enumerate() {
        report.rows_read += 1;
        match result {
            Ok(row) => rows.push(row),
            Err(e) => {
                let skip = SkippedRow {
                    row: index,
                    column: offending_column(&e, &headers),
                    message: e.to_string(),
                };
                warn!(error = %skip.to_error(), "skipping malformed row");
                report.skipped.push(skip);
            }
        }
    }
    Ok((rows, report))
}

/// Best-effort attribution of a row-level defect to a column name.
fn offending_column(error: &csv::Error, headers: &csv::StringRecord) -> String {
    if let csv::ErrorKind::Deserialize { err, .. } = error.kind()
        && let Some(field) = err.field()
        && let Some(name) = headers.get(field as usize)
    {
        return name.to_string();
    }
    "<row>".to_string()
}

fn write_rows<T: Serialize, W: Write>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)
            .map_err(|e| AeroviaError::Other(format!("CSV write failed: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AeroviaError::Other(format!("CSV flush failed: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_aqi_round_trip() {
        let table = TimeSeriesTable::from_records(vec![
            AqiRecord {
                date: d(1),
                pm25: 12.5,
                pm10: 22.0,
                no2: 18.25,
                ozone: 31.0,
                aqi: 48.0,
            },
            AqiRecord {
                date: d(2),
                pm25: 14.0,
                pm10: 25.5,
                no2: 19.0,
                ozone: 29.5,
                aqi: 52.0,
            },
        ])
        .unwrap();

        let mut buf = Vec::new();
        write_aqi(&mut buf, &table).unwrap();
        let (rows, report) = read_aqi(buf.as_slice()).unwrap();

        assert_eq!(report.rows_read, 2);
        assert!(report.skipped.is_empty());
        assert_eq!(rows, table.records());
    }

    #[test]
    fn test_transport_round_trip() {
        let table = TimeSeriesTable::from_records(vec![TransportRecord {
            date: d(1),
            bus_passengers: 14_832,
            metro_passengers: 25_101,
        }])
        .unwrap();

        let mut buf = Vec::new();
        write_transport(&mut buf, &table).unwrap();
        let (rows, _) = read_transport(buf.as_slice()).unwrap();
        assert_eq!(rows, table.records());
    }

    #[test]
    fn test_missing_column_fails_whole_load() {
        let csv = "date,pm25,pm10,no2,ozone\n2024-01-01,1,2,3,4\n";
        let err = read_aqi(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, AeroviaError::MissingColumn(ref c) if c == "aqi"));
    }

    #[test]
    fn test_malformed_row_is_skipped_and_reported() {
        let csv = "date,pm25,pm10,no2,ozone,aqi\n\
                   2024-01-01,1,2,3,4,50\n\
                   not-a-date,1,2,3,4,50\n\
                   2024-01-03,1,2,3,4,55\n";
        let (rows, report) = read_aqi(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].row, 1);
        assert_eq!(report.skipped[0].column, "date");
        assert!(matches!(
            report.skipped[0].to_error(),
            AeroviaError::Validation { row: 1, ref column, .. } if column == "date"
        ));
        assert!(
            report.skipped[0]
                .to_error()
                .to_string()
                .starts_with("Row 1, column 'date':")
        );
    }

    #[test]
    fn test_negative_counts_saturate_to_zero() {
        let csv = "date,bus_passengers,metro_passengers\n2024-01-01,-5,9000\n";
        let (rows, report) = read_transport(csv.as_bytes()).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(rows[0].bus_passengers, 0);
        assert_eq!(rows[0].metro_passengers, 9000);
    }

    #[test]
    fn test_columns_match_by_name_not_position() {
        let csv = "metro_passengers,date,bus_passengers\n9000,2024-01-01,4000\n";
        let (rows, _) = read_transport(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].bus_passengers, 4000);
        assert_eq!(rows[0].metro_passengers, 9000);
    }
}
