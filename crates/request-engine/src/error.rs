//! Engine error types.
//!
//! Formatting, classification, filtering and aggregation are total and never
//! fail. Errors only arise when parsing a filter specification from text and
//! when allocating new request numbers.

use request_types::RequestType;
use thiserror::Error;

/// A filter axis or value that the engine does not understand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterSpecError {
    #[error("Unknown filter axis '{0}'")]
    UnknownAxis(String),

    #[error("Invalid value '{value}' for filter axis '{axis}'")]
    UnknownValue {
        /// Axis being set.
        axis: &'static str,
        /// Rejected value.
        value: String,
    },
}

impl FilterSpecError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownAxis(_) => "UNKNOWN_FILTER_AXIS",
            Self::UnknownValue { .. } => "UNKNOWN_FILTER_VALUE",
        }
    }
}

/// Errors raised while allocating request or revision numbers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberingError {
    #[error("Project name is required to allocate a number")]
    EmptyProject,

    #[error("CPR requests are only available for the Civil/Structure department (got '{department}')")]
    CprRequiresStructural {
        /// Department the CPR was requested for.
        department: String,
    },

    #[error("{0} is not a request type with its own counter")]
    NotARequest(RequestType),

    #[error("Revision number is required")]
    EmptyRevisionLabel,

    #[error("Counter '{key}' has no numbers left")]
    CounterOverflow {
        /// Counter that reached its maximum.
        key: String,
    },
}

impl NumberingError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyProject => "EMPTY_PROJECT",
            Self::CprRequiresStructural { .. } => "CPR_REQUIRES_STRUCTURAL",
            Self::NotARequest(_) => "NOT_A_REQUEST",
            Self::EmptyRevisionLabel => "EMPTY_REVISION_LABEL",
            Self::CounterOverflow { .. } => "COUNTER_OVERFLOW",
        }
    }

    /// True when the caller supplied bad input (as opposed to asking for
    /// something the domain forbids).
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::EmptyProject | Self::EmptyRevisionLabel)
    }
}
