//! Error types for dst-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DstError {
    /// A fixed-date rule names a day that does not exist in the target month.
    #[error("Invalid date: {year:04}-{month:02}-{day:02} does not exist")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Time zone not found: {0}")]
    ZoneNotFound(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

pub type Result<T> = std::result::Result<T, DstError>;
