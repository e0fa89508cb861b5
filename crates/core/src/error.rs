//! Error types for mediadex.

use crate::record::RecordId;
use alloc::string::String;
use core::fmt;

/// Result type alias for mediadex operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types for repository and index operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// No record with the given identifier exists.
    NotFound {
        id: RecordId,
    },
    /// A structure was configured with parameters it cannot run with.
    InvalidConfiguration {
        message: String,
    },
    /// A caller-supplied field value could not be parsed.
    MalformedInput {
        field: String,
        value: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFound { id } => write!(f, "Record not found: {}", id),
            Error::InvalidConfiguration { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
            Error::MalformedInput { field, value } => {
                write!(f, "Malformed value for {}: {:?}", field, value)
            }
        }
    }
}

impl core::error::Error for Error {}

impl Error {
    /// Creates a not found error.
    pub fn not_found(id: RecordId) -> Self {
        Error::NotFound { id }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Error::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Creates a malformed input error.
    pub fn malformed_input(field: impl Into<String>, value: impl Into<String>) -> Self {
        Error::MalformedInput {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns true if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
