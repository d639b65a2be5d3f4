//! Error types for the LIFT codec.

use thiserror::Error;

/// Why a LIFT input could not be turned into entries.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The bytes are not well-formed XML.
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },

    /// Well-formed XML that is not a usable LIFT structure.
    #[error("invalid LIFT: {message}")]
    Invalid { message: String },

    /// Nesting went past the configured limit.
    #[error("nesting of <{element}> exceeds the limit of {limit}")]
    RecursionLimitExceeded { element: String, limit: usize },
}

impl ParseError {
    pub fn malformed(position: u64, message: impl Into<String>) -> Self {
        Self::Malformed {
            position,
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub fn recursion_limit(element: impl Into<String>, limit: usize) -> Self {
        Self::RecursionLimitExceeded {
            element: element.into(),
            limit,
        }
    }
}

/// Writer failure. Writing into memory cannot fail for a well-formed model,
/// so seeing this means a bug, not bad data.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("XML write error: {0}")]
    Xml(String),

    #[error("output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl SerializeError {
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }
}

/// Failure at the JSON projection boundary.
#[derive(Debug, Error)]
pub enum JsonError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
