//! CSV data log adapter.
//!
//! One row per sample, appended to a file with a header row. Rows are
//! buffered until [`DataLogPort::flush`]. Booleans are written as `0`/`1`
//! so every column reads back as a number.

use std::fs::{File, OpenOptions};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Serialize;
use time::format_description::well_known::Rfc3339;

use crate::app::ports::DataLogPort;
use crate::control::SampleRecord;
use crate::error::DataLogError;
use crate::stats::read_column;

/// One data log row, fields in [`SampleRecord::COLUMNS`] order.
#[derive(Debug, Serialize)]
pub struct CsvRow {
    timestamp: String,
    temp_inside: f32,
    rh_inside: f32,
    temp_outside: f32,
    lux: f32,
    moisture: f32,
    roof_open: u8,
    fan_on: u8,
    heat_pad_on: u8,
    cover_on: u8,
    is_night: u8,
}

impl TryFrom<&SampleRecord> for CsvRow {
    type Error = DataLogError;

    fn try_from(record: &SampleRecord) -> Result<Self, DataLogError> {
        let r = &record.reading;
        Ok(Self {
            timestamp: record
                .timestamp
                .format(&Rfc3339)
                .map_err(|_| DataLogError::WriteFailed)?,
            temp_inside: r.temp_inside,
            rh_inside: r.rh_inside,
            temp_outside: r.temp_outside,
            lux: r.lux,
            moisture: r.moisture,
            roof_open: record.roof_open,
            fan_on: u8::from(record.fan_on),
            heat_pad_on: u8::from(record.heat_pad_on),
            cover_on: u8::from(record.cover_on),
            is_night: u8::from(record.is_night),
        })
    }
}

pub struct CsvDataLog {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvDataLog {
    /// Open (or create) the log, writing the header into a new file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DataLogError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|_| DataLogError::WriteFailed)?;
        let is_new = file
            .metadata()
            .map_err(|_| DataLogError::WriteFailed)?
            .len()
            == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            writer
                .write_record(SampleRecord::COLUMNS)
                .map_err(|_| DataLogError::WriteFailed)?;
            writer.flush().map_err(|_| DataLogError::WriteFailed)?;
        }
        log::info!("Data log at {}", path.display());
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DataLogPort for CsvDataLog {
    fn append(&mut self, record: &SampleRecord) -> Result<(), DataLogError> {
        let row = CsvRow::try_from(record)?;
        self.writer
            .serialize(row)
            .map_err(|_| DataLogError::WriteFailed)
    }

    fn flush(&mut self) -> Result<(), DataLogError> {
        self.writer.flush().map_err(|_| DataLogError::WriteFailed)
    }

    fn column(&self, name: &str) -> Result<Vec<f32>, DataLogError> {
        let file = File::open(&self.path).map_err(|_| DataLogError::ReadFailed)?;
        read_column(BufReader::new(file), name)
    }
}
