//! Command parsing and dispatch.
//!
//! Turns a command name plus positional arguments into a typed [`Command`],
//! runs it against a [`Store`], and reports the result as a [`Response`].
//! Every failure, including bad arguments, becomes an error response.
//!
//! # Example Usage
//!
//! ```rust
//! use attendance::command::run;
//! use attendance::store::Store;
//!
//! let mut store = Store::new();
//!
//! let outcome = run("mark", &["101", "2025-07-01"], false, &mut store);
//! assert!(outcome.response.is_success());
//! assert!(outcome.mutated);
//!
//! let outcome = run("mark", &["101", "2025-07-01"], false, &mut store);
//! assert!(!outcome.response.is_success());
//! assert!(!outcome.mutated);
//! ```

use tracing::{debug, error, warn};

use crate::error::{ArgumentError, AttendanceError, StorageError};
use crate::response::Response;
use crate::storage::DataFile;
use crate::store::{Store, StudentId};
use crate::validate::{validate_date, validate_roll_no};

/// A parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Record attendance for a student on a date.
    Mark {
        /// Student to mark.
        roll_no: StudentId,
        /// Date string, stored as given.
        date: String,
    },
    /// Show the dates recorded for a student.
    View {
        /// Student to look up.
        roll_no: StudentId,
    },
    /// Show summary statistics.
    Stats,
}

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Response to print.
    pub response: Response,
    /// Whether the store changed and must be saved.
    pub mutated: bool,
}

impl Command {
    /// Parses a command name and its positional arguments.
    ///
    /// With `strict`, roll numbers must be positive and dates must look like
    /// `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// - [`ArgumentError::Usage`] on a wrong argument count
    /// - [`ArgumentError::InvalidRollNo`] if the roll number is not an integer
    /// - [`ArgumentError::UnknownCommand`] for any other command name
    /// - [`ArgumentError::NonPositiveRollNo`] / [`ArgumentError::InvalidDate`]
    ///   in strict mode
    pub fn parse<S: AsRef<str>>(name: &str, args: &[S], strict: bool) -> Result<Self, ArgumentError> {
        let command = match name {
            "mark" => match args {
                [roll_no, date] => Self::Mark {
                    roll_no: parse_roll_no(roll_no.as_ref())?,
                    date: date.as_ref().to_string(),
                },
                _ => {
                    return Err(ArgumentError::Usage {
                        usage: "mark <roll_no> <date>",
                    });
                }
            },
            "view" => match args {
                [roll_no] => Self::View {
                    roll_no: parse_roll_no(roll_no.as_ref())?,
                },
                _ => {
                    return Err(ArgumentError::Usage {
                        usage: "view <roll_no>",
                    });
                }
            },
            "stats" => match args {
                [] => Self::Stats,
                _ => return Err(ArgumentError::Usage { usage: "stats" }),
            },
            other => {
                return Err(ArgumentError::UnknownCommand {
                    command: other.to_string(),
                });
            }
        };

        if strict {
            command.validate()?;
        }
        Ok(command)
    }

    fn validate(&self) -> Result<(), ArgumentError> {
        match self {
            Self::Mark { roll_no, date } => {
                validate_roll_no(*roll_no)?;
                validate_date(date)
            }
            Self::View { roll_no } => validate_roll_no(*roll_no),
            Self::Stats => Ok(()),
        }
    }

    /// Runs the command against `store`.
    pub fn execute(&self, store: &mut Store) -> Outcome {
        debug!(command = ?self, "executing command");

        match self {
            Self::Mark { roll_no, date } => match store.mark(*roll_no, date) {
                Ok(()) => Outcome {
                    response: Response::marked(*roll_no, date),
                    mutated: true,
                },
                Err(e) => Outcome {
                    response: e.into(),
                    mutated: false,
                },
            },
            Self::View { roll_no } => Outcome {
                response: match store.view(*roll_no) {
                    Ok(dates) => Response::attendance(*roll_no, dates),
                    Err(e) => e.into(),
                },
                mutated: false,
            },
            Self::Stats => Outcome {
                response: Response::stats(store.stats()),
                mutated: false,
            },
        }
    }
}

/// Parses and executes one command, reporting argument errors as responses.
pub fn run<S: AsRef<str>>(name: &str, args: &[S], strict: bool, store: &mut Store) -> Outcome {
    match Command::parse(name, args, strict) {
        Ok(command) => command.execute(store),
        Err(e) => {
            debug!("rejected arguments: {e}");
            Outcome {
                response: Response::error(e),
                mutated: false,
            }
        }
    }
}

/// Runs one command against the data file: load, execute, save if changed.
///
/// A file that fails to load is treated as holding no records, so `view` and
/// `stats` still answer. A mutation is never saved over such a file; the
/// command instead reports [`StorageError::Damaged`] and the file is left as
/// it was. A failed write is logged and does not change the response.
pub fn invoke<S: AsRef<str>>(file: &DataFile, name: &str, args: &[S], strict: bool) -> Response {
    let (mut store, load_error) = match file.load() {
        Ok(loaded) => (loaded.into_store(), None),
        Err(e) => {
            warn!(path = %file.path().display(), "ignoring data file: {e}");
            (Store::new(), Some(e))
        }
    };

    let outcome = run(name, args, strict, &mut store);
    if !outcome.mutated {
        return outcome.response;
    }

    if let Some(e) = load_error {
        let err = AttendanceError::from(StorageError::Damaged {
            path: file.path().to_path_buf(),
            reason: e.to_string(),
        });
        error!("{err}");
        return Response::error(err);
    }

    if let Err(e) = file.save(&store) {
        error!("{e}");
    }
    outcome.response
}

fn parse_roll_no(value: &str) -> Result<StudentId, ArgumentError> {
    value.trim().parse().map_err(|_| ArgumentError::InvalidRollNo {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Status;
    use crate::store::Stats;

    const NO_ARGS: [&str; 0] = [];

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("mark", &["101", "2025-07-01"], false),
            Ok(Command::Mark {
                roll_no: StudentId(101),
                date: "2025-07-01".to_string(),
            })
        );
        assert_eq!(
            Command::parse("view", &["-3"], false),
            Ok(Command::View {
                roll_no: StudentId(-3)
            })
        );
        assert_eq!(Command::parse("stats", &NO_ARGS, false), Ok(Command::Stats));
    }

    #[test]
    fn test_parse_wrong_argument_counts() {
        assert_eq!(
            Command::parse("mark", &["101"], false),
            Err(ArgumentError::Usage {
                usage: "mark <roll_no> <date>"
            })
        );
        assert_eq!(
            Command::parse("view", &NO_ARGS, false),
            Err(ArgumentError::Usage {
                usage: "view <roll_no>"
            })
        );
        assert_eq!(
            Command::parse("stats", &["extra"], false),
            Err(ArgumentError::Usage { usage: "stats" })
        );
    }

    #[test]
    fn test_parse_bad_roll_number() {
        assert_eq!(
            Command::parse("view", &["abc"], false),
            Err(ArgumentError::InvalidRollNo {
                value: "abc".to_string()
            })
        );
        assert!(Command::parse("mark", &["12.5", "2025-07-01"], false).is_err());
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            Command::parse("delete", &["1"], false),
            Err(ArgumentError::UnknownCommand {
                command: "delete".to_string()
            })
        );
    }

    #[test]
    fn test_strict_mode() {
        assert!(Command::parse("mark", &["0", "2025-07-01"], true).is_err());
        assert!(Command::parse("mark", &["5", "July 1st"], true).is_err());
        assert!(Command::parse("view", &["-1"], true).is_err());
        assert!(Command::parse("mark", &["5", "2025-07-01"], true).is_ok());

        // Lenient mode accepts both.
        assert!(Command::parse("mark", &["0", "July 1st"], false).is_ok());
    }

    #[test]
    fn test_execute_mark_then_duplicate() {
        let mut store = Store::new();
        let command = Command::Mark {
            roll_no: StudentId(101),
            date: "2025-07-01".to_string(),
        };

        let first = command.execute(&mut store);
        assert!(first.mutated);
        assert_eq!(first.response.status, Status::Success);

        let second = command.execute(&mut store);
        assert!(!second.mutated);
        assert_eq!(
            second.response.message.as_deref(),
            Some("Attendance already marked for Roll No: 101 on 2025-07-01")
        );
        assert_eq!(store.view(StudentId(101)).unwrap(), ["2025-07-01"]);
    }

    #[test]
    fn test_execute_view_missing() {
        let mut store = Store::new();
        let outcome = Command::View {
            roll_no: StudentId(999),
        }
        .execute(&mut store);

        assert!(!outcome.mutated);
        assert_eq!(outcome.response.status, Status::Error);
        assert_eq!(outcome.response.roll_no, Some(StudentId(999)));
    }

    #[test]
    fn test_run_scenario_stats() {
        let mut store = Store::new();
        run("mark", &["101", "2025-07-01"], false, &mut store);
        run("mark", &["101", "2025-07-02"], false, &mut store);
        run("mark", &["102", "2025-07-01"], false, &mut store);

        let outcome = run("stats", &NO_ARGS, false, &mut store);
        assert_eq!(
            outcome.response.stats,
            Some(Stats {
                total_students: 2,
                total_unique_dates: 2,
                total_attendance_entries: 3,
            })
        );
    }

    #[test]
    fn test_run_reports_argument_errors() {
        let mut store = Store::new();
        let outcome = run("frobnicate", &NO_ARGS, false, &mut store);

        assert!(!outcome.mutated);
        assert_eq!(
            outcome.response.to_json(),
            r#"{"status":"error","message":"Unknown command: frobnicate"}"#
        );
    }

    #[test]
    fn test_invoke_saves_successful_mark() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file = DataFile::new(temp_dir.path().join("data.json"));

        let response = invoke(&file, "mark", &["3", "z"], false);
        assert!(response.is_success());
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), r#"{"3":["z"]}"#);

        let response = invoke(&file, "view", &["3"], false);
        assert_eq!(response.dates, Some(vec!["z".to_string()]));
    }

    #[test]
    fn test_invoke_never_overwrites_damaged_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("data.json");
        let damaged = r#"{"1":["a"],"2":"b"}"#;
        std::fs::write(&path, damaged).unwrap();
        let file = DataFile::new(&path);

        let response = invoke(&file, "mark", &["3", "z"], false);
        assert_eq!(response.status, Status::Error);
        assert!(
            response
                .message
                .as_deref()
                .unwrap()
                .contains("refusing to overwrite")
        );
        assert_eq!(std::fs::read_to_string(&path).unwrap(), damaged);

        // Reads still answer from an empty store.
        let response = invoke(&file, "stats", &NO_ARGS, false);
        assert!(response.is_success());
        assert_eq!(response.stats, Some(Stats::default()));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), damaged);
    }
}
