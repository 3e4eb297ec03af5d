//! Record status vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::FerryError;

/// Processing status of a record.
///
/// Driven by external status-update messages, typically:
/// - Pending -> Processed (downstream handled the record)
/// - Pending -> Error (downstream rejected it)
/// - Error -> Retry (operator re-drive)
///
/// The wire form is the numeric code; see [`Status::code`] and the fallible
/// `TryFrom<i32>`. Unknown codes never make it into a `Status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Freshly created, not yet reported on.
    #[default]
    Pending,

    /// Successfully handled downstream.
    Processed,

    /// Rejected or failed downstream.
    Error,

    /// Queued for another delivery attempt.
    Retry,
}

impl Status {
    /// Numeric wire code.
    pub fn code(self) -> i32 {
        match self {
            Status::Pending => 0,
            Status::Processed => 1,
            Status::Error => 2,
            Status::Retry => 3,
        }
    }
}

impl TryFrom<i32> for Status {
    type Error = FerryError;

    fn try_from(code: i32) -> Result<Self, FerryError> {
        match code {
            0 => Ok(Status::Pending),
            1 => Ok(Status::Processed),
            2 => Ok(Status::Error),
            3 => Ok(Status::Retry),
            other => Err(FerryError::Decode(format!("unknown status code {other}"))),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Pending => "pending",
            Status::Processed => "processed",
            Status::Error => "error",
            Status::Retry => "retry",
        };
        f.write_str(name)
    }
}
