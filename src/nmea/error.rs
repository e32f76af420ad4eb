use thiserror::Error;

/// Errors that make a whole log line unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// No numeric value follows the timestamp marker
    #[error("no timestamp")]
    NoTimestamp,
    /// No 5 letter sentence identifier follows the type prefix
    #[error("no sentence type")]
    NoSentenceType,
}

/// Failure to derive one value out of a field sequence.
/// The record is still produced, the value is simply left out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field #{0} is missing")]
    Missing(usize),
    #[error("field #{index}: \"{value}\" is not a valid integer")]
    InvalidInteger { index: usize, value: String },
    #[error("\"{0}\" is not a valid fix mode")]
    UnknownMode(String),
}
