//! Errors raised while turning user-supplied text into engine values.
//!
//! Nothing in here covers classification outcomes: an unmatched transaction
//! or an empty date window is a result, not an error.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TallyError {
    #[error("invalid date `{0}` (expected MM/DD/YYYY)")]
    InvalidDate(String),
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("malformed date range `{0}` (expected two MM/DD/YYYY dates)")]
    MalformedRange(String),
}

pub type Result<T> = std::result::Result<T, TallyError>;
