//! Structured command responses.
//!
//! Every command prints exactly one JSON object with a `status` field of
//! `"success"` or `"error"`. All of them go through [`Response`] and
//! serde_json, so dates containing quotes or control characters can never
//! produce malformed output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::store::{Stats, StudentId};

/// Outcome tag of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The command did what was asked.
    Success,
    /// The command was rejected or could not run.
    Error,
}

/// A single JSON response object.
///
/// Fields that do not apply to a response are omitted from the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Success or error.
    pub status: Status,
    /// Human-readable summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Student the response refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_no: Option<StudentId>,
    /// Date the response refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Recorded dates, for `view`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<String>>,
    /// Summary counts, for `stats`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Stats>,
}

impl Response {
    fn new(status: Status) -> Self {
        Self {
            status,
            message: None,
            roll_no: None,
            date: None,
            dates: None,
            stats: None,
        }
    }

    /// Attendance was recorded.
    pub fn marked(roll_no: StudentId, date: &str) -> Self {
        Self {
            message: Some(format!(
                "Attendance marked for Roll No: {roll_no} on {date}"
            )),
            roll_no: Some(roll_no),
            date: Some(date.to_string()),
            ..Self::new(Status::Success)
        }
    }

    /// The dates recorded for a student.
    pub fn attendance(roll_no: StudentId, dates: &[String]) -> Self {
        Self {
            roll_no: Some(roll_no),
            dates: Some(dates.to_vec()),
            ..Self::new(Status::Success)
        }
    }

    /// Summary statistics.
    pub fn stats(stats: Stats) -> Self {
        Self {
            stats: Some(stats),
            ..Self::new(Status::Success)
        }
    }

    /// An error carrying only a message.
    pub fn error(err: impl fmt::Display) -> Self {
        Self {
            message: Some(err.to_string()),
            ..Self::new(Status::Error)
        }
    }

    /// Returns true for success responses.
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Renders the response as a single-line JSON object.
    pub fn to_json(&self) -> String {
        // Only strings, integers and options: serialization does not fail.
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"status":"error","message":"failed to serialize response"}"#.to_string()
        })
    }
}

impl From<RecordError> for Response {
    fn from(err: RecordError) -> Self {
        let message = Some(err.to_string());
        match err {
            RecordError::AlreadyMarked { roll_no, date } => Self {
                message,
                roll_no: Some(roll_no),
                date: Some(date),
                ..Self::new(Status::Error)
            },
            RecordError::NotFound { roll_no } => Self {
                message,
                roll_no: Some(roll_no),
                ..Self::new(Status::Error)
            },
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArgumentError;

    #[test]
    fn test_marked_json() {
        let response = Response::marked(StudentId(101), "2025-07-01");
        assert!(response.is_success());
        assert_eq!(
            response.to_json(),
            r#"{"status":"success","message":"Attendance marked for Roll No: 101 on 2025-07-01","roll_no":101,"date":"2025-07-01"}"#
        );
    }

    #[test]
    fn test_attendance_json() {
        let dates = vec!["2025-07-01".to_string(), "2025-07-02".to_string()];
        let response = Response::attendance(StudentId(7), &dates);
        assert_eq!(
            response.to_json(),
            r#"{"status":"success","roll_no":7,"dates":["2025-07-01","2025-07-02"]}"#
        );
    }

    #[test]
    fn test_stats_json() {
        let response = Response::stats(Stats {
            total_students: 2,
            total_unique_dates: 2,
            total_attendance_entries: 3,
        });
        assert_eq!(
            response.to_json(),
            r#"{"status":"success","stats":{"total_students":2,"total_unique_dates":2,"total_attendance_entries":3}}"#
        );
    }

    #[test]
    fn test_error_json() {
        let response = Response::error(ArgumentError::UnknownCommand {
            command: "purge".to_string(),
        });
        assert!(!response.is_success());
        assert_eq!(
            response.to_json(),
            r#"{"status":"error","message":"Unknown command: purge"}"#
        );
    }

    #[test]
    fn test_record_errors_keep_context() {
        let response: Response = RecordError::AlreadyMarked {
            roll_no: StudentId(101),
            date: "2025-07-01".to_string(),
        }
        .into();
        assert_eq!(response.status, Status::Error);
        assert_eq!(response.roll_no, Some(StudentId(101)));
        assert_eq!(response.date.as_deref(), Some("2025-07-01"));

        let response: Response = RecordError::NotFound {
            roll_no: StudentId(999),
        }
        .into();
        assert_eq!(response.message.as_deref(), Some("Roll No: 999 not found."));
        assert_eq!(response.roll_no, Some(StudentId(999)));
    }

    #[test]
    fn test_special_characters_stay_valid_json() {
        let response = Response::marked(StudentId(1), "quote\" and\nnewline");
        let parsed: Response = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(parsed, response);
    }
}
