//! Data file persistence.
//!
//! The whole store lives in one text file. Every process reads it once at
//! start and, after a successful mutation, rewrites it in full. There is no
//! locking: two processes marking at the same time may race, and the last
//! writer wins.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::codec;
use crate::error::{Result, StorageError};
use crate::store::Store;

/// Default name of the data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "attendance_data.json";

/// What was found when loading the data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    /// No file exists yet.
    Missing,
    /// The file exists but holds no data.
    Empty,
    /// The file was decoded into a store.
    Records(Store),
}

impl Loaded {
    /// Returns the loaded store, or an empty one.
    pub fn into_store(self) -> Store {
        match self {
            Self::Records(store) => store,
            Self::Missing | Self::Empty => Store::new(),
        }
    }
}

/// Handle to the persisted data file.
#[derive(Debug, Clone)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    /// Creates a handle for the file at `path`. Nothing is touched on disk.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the data file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and decodes the data file.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Read`] if the file exists but cannot be read
    /// - [`AttendanceError::Codec`](crate::error::AttendanceError::Codec) if
    ///   its contents do not decode
    pub fn load(&self) -> Result<Loaded> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "data file not found");
            return Ok(Loaded::Missing);
        }

        let text = std::fs::read_to_string(&self.path).map_err(|e| StorageError::Read {
            path: self.path.clone(),
            source: e,
        })?;

        match codec::decode(&text)? {
            Some(store) => {
                debug!(
                    path = %self.path.display(),
                    students = store.len(),
                    "loaded data file"
                );
                Ok(Loaded::Records(store))
            }
            None => Ok(Loaded::Empty),
        }
    }

    /// Encodes `store` and replaces the data file with it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the file cannot be written.
    pub fn save(&self, store: &Store) -> Result<()> {
        std::fs::write(&self.path, codec::encode(store)).map_err(|e| StorageError::Write {
            path: self.path.clone(),
            source: e,
        })?;

        debug!(
            path = %self.path.display(),
            students = store.len(),
            "saved data file"
        );
        Ok(())
    }
}

impl Default for DataFile {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}
