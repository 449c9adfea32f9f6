use std::fmt;
use thiserror::Error;

/// Terminal error of an endpoint operation.
///
/// Every failed operation carries exactly one of these variants. Use
/// [`TweetError::kind`] when only the category matters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TweetError {
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("Transport error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("Response parsing error: {0}")]
    JsonParsing(String),

    #[error("Mapping error: {0}")]
    Mapping(String),
}

/// Error category tag surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AuthenticationRequired,
    Transport,
    JsonParsing,
    Mapping,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AuthenticationRequired => "AuthenticationRequiredError",
            Self::Transport => "TransportError",
            Self::JsonParsing => "JsonParsingError",
            Self::Mapping => "MappingError",
        };
        f.write_str(name)
    }
}

impl TweetError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationRequired(_) => ErrorKind::AuthenticationRequired,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::JsonParsing(_) => ErrorKind::JsonParsing,
            Self::Mapping(_) => ErrorKind::Mapping,
        }
    }

    /// Human-readable message without the category prefix
    pub fn message(&self) -> &str {
        match self {
            Self::AuthenticationRequired(message)
            | Self::Transport { message, .. }
            | Self::JsonParsing(message)
            | Self::Mapping(message) => message,
        }
    }

    /// HTTP status for transport errors raised by a non-2xx response
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub(crate) fn missing_field(record: &str, field: &str) -> Self {
        Self::Mapping(format!("{} is missing required field '{}'", record, field))
    }
}
