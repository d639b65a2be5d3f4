//! Error types for ranges loading and resolution.

use serde::Serialize;
use thiserror::Error;

use crate::lift::ParseError;

/// A ranges file could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RangesError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid ranges file: {0}")]
    Invalid(String),

    #[error("range `{0}` is defined more than once")]
    DuplicateRange(String),
}

impl RangesError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// A resolution request that could not be answered as asked.
///
/// Cycles are reported through this type but never abort a tree build; see
/// [`ResolvedTree::warnings`](super::ResolvedTree::warnings).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Error)]
pub enum ResolverError {
    /// `path` starts and ends with the same element id.
    #[error("parent cycle in range `{range}`: {}", path.join(" -> "))]
    Cycle { range: String, path: Vec<String> },

    #[error("unknown range `{0}`")]
    UnknownRange(String),

    #[error("range `{range}` has no element `{element}`")]
    UnknownElement { range: String, element: String },
}

impl ResolverError {
    pub fn cycle(range: impl Into<String>, path: Vec<String>) -> Self {
        Self::Cycle {
            range: range.into(),
            path,
        }
    }

    pub fn unknown_element(range: impl Into<String>, element: impl Into<String>) -> Self {
        Self::UnknownElement {
            range: range.into(),
            element: element.into(),
        }
    }
}
