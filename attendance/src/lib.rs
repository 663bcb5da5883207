//! # attendance
//!
//! Student attendance records kept in a single flat file.
//!
//! Each process invocation loads the whole data file, performs one operation
//! (mark, view, or stats), rewrites the file if the operation changed
//! anything, and exits. The library holds everything except argument
//! parsing and logging setup, which live in the `attendance-cli` binary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use attendance::{DataFile, command};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = DataFile::new("attendance_data.json");
//! let mut store = file.load()?.into_store();
//!
//! let outcome = command::run("mark", &["101", "2025-07-01"], false, &mut store);
//! if outcome.mutated {
//!     file.save(&store)?;
//! }
//! println!("{}", outcome.response.to_json());
//!
//! // Or in one step, with the CLI's handling of damaged files:
//! let response = command::invoke(&file, "view", &["101"], false);
//! println!("{}", response.to_json());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`store`] — Record store: mark, view, stats
//! - [`codec`] — Persisted text format (decode and encode)
//! - [`storage`] — Reading and writing the data file
//! - [`command`] — Command parsing and dispatch
//! - [`response`] — JSON response objects
//! - [`validate`] — Optional strict input checks
//! - [`error`] — Error types

pub mod codec;
pub mod command;
pub mod error;
pub mod response;
pub mod storage;
pub mod store;
pub mod validate;

// Re-export primary API types at crate root for convenience.
pub use command::{Command, Outcome};
pub use error::{AttendanceError, Result};
pub use response::{Response, Status};
pub use storage::{DataFile, Loaded};
pub use store::{Stats, Store, StudentId};
