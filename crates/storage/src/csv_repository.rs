//! CSV-backed History Store
//!
//! Layout: a header row `pH,Temperature,Ammonia,Nitrite,Nitrate,Oxygen,Date`
//! followed by one row per reading, oldest first. Appends rewrite the file
//! through a temporary sibling and an atomic rename, so a failed write never
//! leaves a half-written store behind. Concurrent writers from other
//! processes are not coordinated.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};
use water_quality::{Reading, WaterSample};

use crate::{History, ReadingStore, StorageError};

/// Format of the `Date` column
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "pH")]
    ph: f64,
    #[serde(rename = "Temperature")]
    temperature: f64,
    #[serde(rename = "Ammonia")]
    ammonia: f64,
    #[serde(rename = "Nitrite")]
    nitrite: f64,
    #[serde(rename = "Nitrate")]
    nitrate: f64,
    #[serde(rename = "Oxygen")]
    oxygen: f64,
    #[serde(rename = "Date", with = "date_column")]
    date: NaiveDateTime,
}

impl From<&Reading> for CsvRow {
    fn from(reading: &Reading) -> Self {
        let s = &reading.sample;
        Self {
            ph: s.ph,
            temperature: s.temperature,
            ammonia: s.ammonia,
            nitrite: s.nitrite,
            nitrate: s.nitrate,
            oxygen: s.dissolved_oxygen,
            date: reading.timestamp,
        }
    }
}

impl From<CsvRow> for Reading {
    fn from(row: CsvRow) -> Self {
        let sample = WaterSample {
            ph: row.ph,
            temperature: row.temperature,
            ammonia: row.ammonia,
            nitrite: row.nitrite,
            nitrate: row.nitrate,
            dissolved_oxygen: row.oxygen,
        };
        Reading::new(sample, row.date)
    }
}

mod date_column {
    use super::DATE_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// History store kept in a single CSV file
#[derive(Debug, Clone)]
pub struct CsvRepository {
    path: PathBuf,
}

impl CsvRepository {
    /// Create a repository for `path`. Nothing is touched until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Using CSV history store at {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents, `None` when the store does not exist yet
    fn read_raw(&self) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(format!("{}: {}", self.path.display(), e))),
        }
    }

    fn write_appended(&self, prior: Option<&[u8]>, reading: &Reading) -> Result<(), StorageError> {
        let write_err = |e: &dyn std::fmt::Display| {
            StorageError::Write(format!("{}: {}", self.path.display(), e))
        };

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| write_err(&e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| write_err(&e))?;

        let has_rows = match prior {
            Some(bytes) if !is_blank(bytes) => {
                tmp.write_all(bytes).map_err(|e| write_err(&e))?;
                if !bytes.ends_with(b"\n") {
                    tmp.write_all(b"\n").map_err(|e| write_err(&e))?;
                }
                true
            }
            _ => false,
        };

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(!has_rows)
                .from_writer(tmp.as_file_mut());
            writer
                .serialize(CsvRow::from(reading))
                .map_err(|e| write_err(&e))?;
            writer.flush().map_err(|e| write_err(&e))?;
        }

        tmp.as_file().sync_all().map_err(|e| write_err(&e))?;
        tmp.persist(&self.path).map_err(|e| write_err(&e.error))?;
        Ok(())
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// Parse a complete store. The header must match [`History::COLUMNS`] exactly.
fn parse_history(bytes: &[u8]) -> Result<History, StorageError> {
    let mut history = History::new();
    if is_blank(bytes) {
        return Ok(history);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader.headers().map_err(|e| StorageError::Format {
        row: None,
        reason: e.to_string(),
    })?;
    if !headers.iter().eq(History::COLUMNS) {
        return Err(StorageError::Format {
            row: None,
            reason: format!(
                "expected columns [{}], found [{}]",
                History::COLUMNS.join(", "),
                headers.iter().collect::<Vec<_>>().join(", ")
            ),
        });
    }

    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row.map_err(|e| StorageError::Format {
            row: Some(index + 1),
            reason: e.to_string(),
        })?;
        history.push(row.into());
    }

    Ok(history)
}

impl ReadingStore for CsvRepository {
    fn load(&self) -> Result<History, StorageError> {
        let history = match self.read_raw()? {
            Some(bytes) => parse_history(&bytes)?,
            None => {
                debug!("History store {} not found, starting empty", self.path.display());
                History::new()
            }
        };
        debug!("Loaded {} readings from {}", history.len(), self.path.display());
        Ok(history)
    }

    fn save(&self, reading: &Reading) -> Result<(), StorageError> {
        let prior = self.read_raw()?;
        // A malformed store blocks appends until it is repaired
        let existing = match &prior {
            Some(bytes) => parse_history(bytes)?.len(),
            None => 0,
        };

        self.write_appended(prior.as_deref(), reading)?;
        info!(
            "Appended reading at {} to {} ({} rows)",
            reading.timestamp.format(DATE_FORMAT),
            self.path.display(),
            existing + 1
        );
        Ok(())
    }
}
