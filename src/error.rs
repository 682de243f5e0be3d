use crate::domain::validation::ValidationErrors;
use thiserror::Error;

/// Errors raised while wiring the terminal together: configuration and HTTP client setup.
///
/// Runtime failures of a transaction never surface here: they are mapped to
/// notifications by the controller.
#[derive(Error, Debug)]
pub enum PosError {
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, PosError>;

/// A line of terminal input that could not be understood.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("line {line}: {reason}")]
    Invalid { line: usize, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons an expiry date is not acceptable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryError {
    #[error("must be in MM/YY format")]
    Malformed,
    #[error("month must be between 01 and 12")]
    OutOfRange,
    #[error("must not be in the past")]
    Expired,
}

/// A single field-level validation failure, shown inline next to the field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("must be exactly 16 digits")]
    CardNumberLength,
    #[error("expiry date {0}")]
    Expiry(#[from] ExpiryError),
    #[error("must be exactly 3 digits")]
    CvvLength,
    #[error("must be a valid number")]
    InvalidAmount,
    #[error("required when deferred")]
    InstallmentsRequired,
}

/// Outcome of a failed submission call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The processor answered with a non-2xx status.
    #[error("{0}")]
    Rejected(String),
    /// The request never completed or the response could not be read.
    #[error("Error: {0}")]
    Transport(String),
    /// The processor accepted the request but returned nothing to poll.
    #[error("{0}")]
    Untracked(String),
}

/// A failed status query. Always transient from the poller's point of view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    #[error("status query failed: {0}")]
    Transport(String),
    #[error("status query returned HTTP {0}")]
    Status(u16),
}

/// Why `TransactionController::submit` did not start a transaction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    #[error("the form has validation errors: {0}")]
    Invalid(ValidationErrors),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
