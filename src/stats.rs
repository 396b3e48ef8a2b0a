//! Aggregates over the data log.
//!
//! Simple scans, no indexing: the last day's worth of readings of one
//! column is summarised into average, low and high.

use std::io::Read;

use crate::error::DataLogError;

/// One day at one reading per minute.
pub const DAY_WINDOW: usize = 1440;

/// Summary of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub average: f32,
    pub low: f32,
    pub high: f32,
    /// Number of readings the summary covers.
    pub count: usize,
}

/// Summarise the last `window` values (all of them if fewer).
///
/// `None` for an empty slice. Non-finite values are skipped.
pub fn summarize(values: &[f32], window: usize) -> Option<ColumnStats> {
    let start = values.len().saturating_sub(window);
    let mut count = 0usize;
    let mut sum = 0.0f64;
    let mut low = f32::INFINITY;
    let mut high = f32::NEG_INFINITY;
    for &v in values[start..].iter().filter(|v| v.is_finite()) {
        count += 1;
        sum += f64::from(v);
        low = low.min(v);
        high = high.max(v);
    }
    if count == 0 {
        return None;
    }
    Some(ColumnStats {
        average: (sum / count as f64) as f32,
        low,
        high,
        count,
    })
}

/// Read one numeric column out of a CSV stream with a header row.
///
/// Rows whose cell does not parse are skipped. A missing column is
/// [`DataLogError::UnknownColumn`].
pub fn read_column(reader: impl Read, column: &str) -> Result<Vec<f32>, DataLogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|_| DataLogError::ReadFailed)?;
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    let index = headers
        .iter()
        .position(|h| h == column)
        .ok_or(DataLogError::UnknownColumn)?;

    let mut values = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|_| DataLogError::ReadFailed)?;
        if let Some(v) = record.get(index).and_then(|cell| cell.parse::<f32>().ok()) {
            values.push(v);
        }
    }
    Ok(values)
}
