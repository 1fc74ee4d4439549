//! In-memory Repository

use std::sync::Mutex;
use tracing::{debug, info};
use water_quality::Reading;

use crate::{History, ReadingStore, StorageError};

/// Reading history kept in memory for the lifetime of the process
pub struct MemoryRepository {
    readings: Mutex<Vec<Reading>>,
}

impl MemoryRepository {
    /// Create an empty in-memory repository
    pub fn new() -> Self {
        info!("Creating in-memory history store");
        Self::with_readings(Vec::new())
    }

    /// Create a repository seeded with existing readings, oldest first
    pub fn with_readings(readings: Vec<Reading>) -> Self {
        Self {
            readings: Mutex::new(readings),
        }
    }

    /// Number of stored readings
    pub fn count(&self) -> usize {
        self.readings.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingStore for MemoryRepository {
    fn load(&self) -> Result<History, StorageError> {
        let readings = self
            .readings
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(History::from(readings.clone()))
    }

    fn save(&self, reading: &Reading) -> Result<(), StorageError> {
        let mut readings = self
            .readings
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        readings.push(*reading);
        debug!("Stored reading #{}", readings.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use water_quality::WaterSample;

    fn reading(minute: u32) -> Reading {
        let sample = WaterSample {
            ph: 7.0,
            temperature: 25.0,
            ammonia: 0.5,
            nitrite: 0.5,
            nitrate: 10.0,
            dissolved_oxygen: 5.0,
        };
        let ts = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, minute, 0)
            .unwrap();
        Reading::new(sample, ts)
    }

    #[test]
    fn test_insert_and_retrieve_in_order() {
        let repo = MemoryRepository::new();
        assert!(repo.load().unwrap().is_empty());

        for minute in 0..3 {
            repo.save(&reading(minute)).unwrap();
        }

        let history = repo.load().unwrap();
        assert_eq!(repo.count(), 3);
        let minutes: Vec<_> = history
            .iter()
            .map(|r| r.timestamp.format("%M").to_string())
            .collect();
        assert_eq!(minutes, ["00", "01", "02"]);
    }

    #[test]
    fn test_seeded_history_kept_before_new_rows() {
        let repo = MemoryRepository::with_readings(vec![reading(0)]);
        repo.save(&reading(5)).unwrap();
        let history = repo.load().unwrap();
        assert_eq!(history.readings()[0], reading(0));
        assert_eq!(history.last(), Some(&reading(5)));
    }
}
