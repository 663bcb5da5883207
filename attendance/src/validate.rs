//! Optional strict input checks.
//!
//! The store itself accepts any integer id and any date string. These checks
//! are applied at the command boundary only when strict mode is requested.

use crate::error::ArgumentError;
use crate::store::StudentId;

/// Rejects zero and negative roll numbers.
///
/// # Errors
///
/// Returns [`ArgumentError::NonPositiveRollNo`] if `roll_no <= 0`.
pub fn validate_roll_no(roll_no: StudentId) -> Result<(), ArgumentError> {
    if roll_no.0 > 0 {
        Ok(())
    } else {
        Err(ArgumentError::NonPositiveRollNo { roll_no })
    }
}

/// Requires a date shaped like `YYYY-MM-DD`.
///
/// Only the shape is checked: ten ASCII characters, dashes at offsets 4 and
/// 7, digits everywhere else. `2025-13-45` passes.
///
/// # Errors
///
/// Returns [`ArgumentError::InvalidDate`] if the shape does not match.
pub fn validate_date(date: &str) -> Result<(), ArgumentError> {
    let bytes = date.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if well_formed {
        Ok(())
    } else {
        Err(ArgumentError::InvalidDate {
            date: date.to_string(),
        })
    }
}
