//! Storage Layer
//!
//! Append-only history of water readings. [`CsvRepository`] keeps the
//! history in a flat CSV file; [`MemoryRepository`] keeps it in memory.

mod csv_repository;
mod history;
mod repository;

pub use csv_repository::{CsvRepository, DATE_FORMAT};
pub use history::History;
pub use repository::MemoryRepository;

use thiserror::Error;
use water_quality::Reading;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Existing store has the wrong columns or an unparseable row
    #[error("Malformed history store{}: {reason}", row_suffix(.row))]
    Format { row: Option<usize>, reason: String },
    /// Existing store could not be read
    #[error("Failed to read history store: {0}")]
    Read(String),
    /// Append could not be written
    #[error("Failed to write history store: {0}")]
    Write(String),
    #[error("Lock error: {0}")]
    Lock(String),
}

fn row_suffix(row: &Option<usize>) -> String {
    row.map(|r| format!(" at row {r}")).unwrap_or_default()
}

/// Append-only reading storage
pub trait ReadingStore: Send + Sync {
    /// Load the full history in arrival order.
    ///
    /// A store that does not exist yet yields an empty history.
    fn load(&self) -> Result<History, StorageError>;

    /// Append one reading after every existing row.
    fn save(&self, reading: &Reading) -> Result<(), StorageError>;
}

impl<T: ReadingStore + ?Sized> ReadingStore for Box<T> {
    fn load(&self) -> Result<History, StorageError> {
        (**self).load()
    }

    fn save(&self, reading: &Reading) -> Result<(), StorageError> {
        (**self).save(reading)
    }
}
