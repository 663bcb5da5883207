//! In-memory attendance record store.
//!
//! The store maps each [`StudentId`] to the dates on which that student was
//! marked present. It owns every mutation and the summary statistics; the
//! [`codec`](crate::codec) module moves it to and from text, and the
//! [`storage`](crate::storage) module moves that text to and from disk.
//!
//! # Invariants
//!
//! - Each student's dates are kept in ascending lexicographic order, which is
//!   chronological for `YYYY-MM-DD` strings. No calendar validation happens.
//! - [`Store::mark`] never introduces a duplicate date. Duplicates can only
//!   enter through [`Store::insert_loaded`], which mirrors what is on disk.
//! - Students iterate in ascending id order.
//!
//! # Example Usage
//!
//! ```rust
//! use attendance::store::{Store, StudentId};
//!
//! let mut store = Store::new();
//! store.mark(StudentId(101), "2025-07-02")?;
//! store.mark(StudentId(101), "2025-07-01")?;
//!
//! assert_eq!(store.view(StudentId(101))?, ["2025-07-01", "2025-07-02"]);
//! assert!(store.mark(StudentId(101), "2025-07-01").is_err());
//! # Ok::<(), attendance::error::RecordError>(())
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RecordError;

/// Integer roll number identifying a student.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StudentId(pub i64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StudentId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(StudentId)
    }
}

impl From<i64> for StudentId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Summary counts over the whole store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of students with an entry.
    pub total_students: usize,
    /// Number of distinct dates across all students.
    pub total_unique_dates: usize,
    /// Total number of (student, date) marks.
    pub total_attendance_entries: usize,
}

/// The full mapping of students to their attendance dates.
///
/// # Thread Safety
///
/// The store is a plain owned value with no interior locking. A caller that
/// shares one across threads must provide its own synchronization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    /// Sorted dates per student, keyed in ascending id order.
    records: BTreeMap<StudentId, Vec<String>>,
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records attendance for `roll_no` on `date`.
    ///
    /// The date is inserted at its sorted position. A student seen for the
    /// first time gets a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::AlreadyMarked`] if `date` is already recorded
    /// for this student. The store is left unchanged in that case.
    pub fn mark(&mut self, roll_no: StudentId, date: &str) -> Result<(), RecordError> {
        let dates = self.records.entry(roll_no).or_default();

        match dates.binary_search_by(|existing| existing.as_str().cmp(date)) {
            Ok(_) => Err(RecordError::AlreadyMarked {
                roll_no,
                date: date.to_string(),
            }),
            Err(index) => {
                dates.insert(index, date.to_string());
                debug!(%roll_no, date, count = dates.len(), "marked attendance");
                Ok(())
            }
        }
    }

    /// Returns the ordered dates recorded for `roll_no`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::NotFound`] if the student has no entry.
    pub fn view(&self, roll_no: StudentId) -> Result<&[String], RecordError> {
        self.records
            .get(&roll_no)
            .map(Vec::as_slice)
            .ok_or(RecordError::NotFound { roll_no })
    }

    /// Computes summary statistics. Always succeeds, even when empty.
    pub fn stats(&self) -> Stats {
        let unique_dates: BTreeSet<&str> = self
            .records
            .values()
            .flatten()
            .map(String::as_str)
            .collect();

        Stats {
            total_students: self.records.len(),
            total_unique_dates: unique_dates.len(),
            total_attendance_entries: self.records.values().map(Vec::len).sum(),
        }
    }

    /// Appends dates read from persisted text, then re-sorts.
    ///
    /// Unlike [`Store::mark`] this does not filter duplicates, so the
    /// in-memory state matches the file exactly. Calling it twice for the
    /// same student accumulates both batches.
    pub fn insert_loaded<I>(&mut self, roll_no: StudentId, dates: I)
    where
        I: IntoIterator<Item = String>,
    {
        let entry = self.records.entry(roll_no).or_default();
        entry.extend(dates);
        entry.sort();
    }

    /// Returns true if the student has an entry.
    pub fn contains(&self, roll_no: StudentId) -> bool {
        self.records.contains_key(&roll_no)
    }

    /// Returns the number of students with an entry.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no student has an entry.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates students in ascending id order with their sorted dates.
    pub fn iter(&self) -> impl Iterator<Item = (StudentId, &[String])> {
        self.records
            .iter()
            .map(|(roll_no, dates)| (*roll_no, dates.as_slice()))
    }
}
