//! Error types for the attendance record store.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::StudentId;

/// The main error type for all attendance operations.
///
/// This enum covers every failure the library can report, from decoding a
/// damaged data file to rejecting a duplicate mark. None of these are fatal
/// to the process: the command layer turns each one into an error response.
#[derive(Error, Debug)]
pub enum AttendanceError {
    /// The persisted text could not be decoded.
    #[error("parse error: {0}")]
    Codec(#[from] CodecError),

    /// A store operation was rejected.
    #[error("{0}")]
    Record(#[from] RecordError),

    /// The command surface received unusable arguments.
    #[error("{0}")]
    Argument(#[from] ArgumentError),

    /// The data file could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Errors raised while decoding the persisted text format.
///
/// Every variant carries the byte offset at which decoding stopped. A decode
/// that fails never yields a partially populated store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended while more tokens were expected.
    #[error("unexpected end of input at byte {position}: expected {expected}")]
    UnexpectedEnd {
        /// Byte offset where input ran out.
        position: usize,
        /// What the parser was looking for.
        expected: &'static str,
    },

    /// A character appeared where the grammar does not allow it.
    #[error("unexpected character {found:?} at byte {position}: expected {expected}")]
    UnexpectedChar {
        /// The offending character.
        found: char,
        /// Byte offset of the offending character.
        position: usize,
        /// What the parser was looking for.
        expected: &'static str,
    },

    /// An object key did not hold an integer roll number.
    #[error("invalid roll number {key:?} at byte {position}")]
    InvalidRollNo {
        /// The key text after quote removal.
        key: String,
        /// Byte offset where the key starts.
        position: usize,
    },

    /// A backslash escape other than the five the encoder produces.
    #[error("unsupported escape sequence '\\{found}' at byte {position}")]
    InvalidEscape {
        /// The character following the backslash.
        found: char,
        /// Byte offset of the backslash.
        position: usize,
    },

    /// Non-whitespace text followed the closing brace.
    #[error("trailing characters after closing brace at byte {position}")]
    TrailingCharacters {
        /// Byte offset of the first trailing character.
        position: usize,
    },
}

/// Errors reported by record store operations.
///
/// These are business outcomes rather than faults: the store is left intact.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The date is already recorded for this student.
    #[error("Attendance already marked for Roll No: {roll_no} on {date}")]
    AlreadyMarked {
        /// The student that was marked.
        roll_no: StudentId,
        /// The date that was already present.
        date: String,
    },

    /// The student has no records.
    #[error("Roll No: {roll_no} not found.")]
    NotFound {
        /// The student that was queried.
        roll_no: StudentId,
    },
}

/// Errors raised while interpreting command-line arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// No command name was given at all.
    #[error("Usage: attendance <command> [args]")]
    MissingCommand,

    /// A known command received the wrong number of arguments.
    #[error("Usage: attendance {usage}")]
    Usage {
        /// Command synopsis, e.g. `mark <roll_no> <date>`.
        usage: &'static str,
    },

    /// The roll number argument is not an integer.
    #[error("Invalid roll number: {value}")]
    InvalidRollNo {
        /// The raw argument.
        value: String,
    },

    /// The command name is not recognised.
    #[error("Unknown command: {command}")]
    UnknownCommand {
        /// The raw command name.
        command: String,
    },

    /// Strict mode rejected a zero or negative roll number.
    #[error("Invalid roll number: {roll_no} (must be positive)")]
    NonPositiveRollNo {
        /// The rejected roll number.
        roll_no: StudentId,
    },

    /// Strict mode rejected a date that is not shaped `YYYY-MM-DD`.
    #[error("Invalid date format: {date:?}. Use YYYY-MM-DD")]
    InvalidDate {
        /// The rejected date.
        date: String,
    },
}

/// Errors raised while reading or writing the data file.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The data file exists but could not be read.
    #[error("failed to read data file '{}': {source}", path.display())]
    Read {
        /// The data file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The data file could not be opened or written.
    #[error("could not open '{}' for writing: {source}", path.display())]
    Write {
        /// The data file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A mutation was not saved because the data file failed to load.
    #[error(
        "refusing to overwrite data file '{}' that failed to load: {reason}",
        path.display()
    )]
    Damaged {
        /// The data file path.
        path: PathBuf,
        /// Why the file failed to load.
        reason: String,
    },
}

/// Type alias for `Result<T, AttendanceError>`.
pub type Result<T> = std::result::Result<T, AttendanceError>;
