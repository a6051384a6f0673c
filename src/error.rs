//! Request-level error types.

use std::error::Error as StdError;
use std::fmt;

/// Error type accepted from business functions.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Coarse classification of a client-side failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A path-sourced value was missing or malformed.
    InvalidArg,
    /// A query- or body-sourced value was missing or malformed.
    InvalidInput,
}

impl ErrorKind {
    /// Message prefix used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArg => "invalid query argument",
            ErrorKind::InvalidInput => "invalid input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A binding or decoding failure, answered with `400 Bad Request`.
///
/// The message is the coarse kind followed, on a new line, by the cause:
///
/// ```text
/// invalid input
/// missing required field: sentence
/// ```
///
/// Business functions may return this type themselves to signal a client
/// error; any other error becomes a `500`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    cause: Option<String>,
}

impl Error {
    /// Create an error of the given kind with a human-readable cause.
    pub fn new(kind: ErrorKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            cause: Some(cause.into()),
        }
    }

    /// Create an [`ErrorKind::InvalidArg`] error.
    pub fn invalid_arg(cause: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArg, cause)
    }

    /// Create an [`ErrorKind::InvalidInput`] error.
    pub fn invalid_input(cause: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, cause)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn cause(&self) -> Option<&str> {
        self.cause.as_deref()
    }

    /// Whether `err`, or anything in its `source()` chain, is an [`Error`].
    pub fn is_client_error(err: &(dyn StdError + 'static)) -> bool {
        let mut current = Some(err);
        while let Some(e) = current {
            if e.is::<Error>() {
                return true;
            }
            current = e.source();
        }
        false
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self { kind, cause: None }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::invalid_input(err.to_string())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\n{}", self.kind, cause),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl StdError for Error {}
