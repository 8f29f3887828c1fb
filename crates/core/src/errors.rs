//! Core error types for the Plan1Q client.
//!
//! Every failure the core can produce maps onto one [`ErrorKind`], which
//! decides whether the UI layer handles it locally or raises a notice.
//! Transport-specific errors (reqwest, JSON decoding) are converted into these
//! variants by the connect crate.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::goals::GoalId;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the Plan1Q core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No usable investment profile could be obtained. Fatal to the wizard.
    #[error("Investment profile unavailable: {0}")]
    ProfileUnavailable(String),

    /// Transport-level failure (connection refused, DNS, broken body).
    #[error("Network request failed: {0}")]
    Network(String),

    /// The caller-imposed timeout elapsed before the collaborator answered.
    #[error("Timed out waiting for {operation}")]
    Timeout { operation: String },

    /// The collaborator answered with something the core cannot use.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The server returned `success: false` with a domain message.
    #[error("{message}")]
    BusinessRejection {
        code: Option<String>,
        message: String,
    },

    #[error("Shared funding account could not be resolved")]
    FundingAccountUnavailable,

    #[error("PIN verification failed")]
    PinRejected,

    /// A state-machine step was invoked from a state that does not allow it.
    #[error("Cannot {action} while {state}")]
    InvalidTransition { state: String, action: String },

    #[error("Goal creation is already in progress")]
    CommitInProgress,

    #[error("Goal {0} was already created from this plan")]
    AlreadyCommitted(GoalId),

    #[error("Goal {0} not found")]
    GoalNotFound(GoalId),

    #[error("Product {0} not found in goal")]
    ProductNotFound(i64),
}

/// Validation errors for user input, raised before any network call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("'{field}' must be greater than zero")]
    NotPositive { field: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("PIN must be exactly 6 digits")]
    MalformedPin,
}

/// The error taxonomy the UI layer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Local, pre-network. Handled inline (disabled button, field message).
    Validation,
    /// Fatal to the wizard.
    ProfileUnavailable,
    /// Transport failure or timeout; the user may retry.
    NetworkFailure,
    /// The server rejected the request with a domain message.
    BusinessRejection,
    /// Missing per-product payment data. Never carried by an [`Error`].
    PartialAggregationGap,
}

impl ErrorKind {
    /// Whether this kind is raised to the user as a transient notice.
    pub fn is_surfaced(&self) -> bool {
        matches!(
            self,
            ErrorKind::ProfileUnavailable | ErrorKind::NetworkFailure | ErrorKind::BusinessRejection
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::ProfileUnavailable => write!(f, "profile_unavailable"),
            ErrorKind::NetworkFailure => write!(f, "network_failure"),
            ErrorKind::BusinessRejection => write!(f, "business_rejection"),
            ErrorKind::PartialAggregationGap => write!(f, "partial_aggregation_gap"),
        }
    }
}

impl Error {
    /// Classifies this error into the taxonomy.
    ///
    /// # Examples
    ///
    /// ```
    /// use plan1q_core::errors::{Error, ErrorKind};
    ///
    /// let err = Error::Timeout { operation: "recommend".to_string() };
    /// assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    ///
    /// assert_eq!(Error::PinRejected.kind(), ErrorKind::BusinessRejection);
    /// ```
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_)
            | Self::InvalidTransition { .. }
            | Self::CommitInProgress
            | Self::AlreadyCommitted(_)
            | Self::GoalNotFound(_)
            | Self::ProductNotFound(_) => ErrorKind::Validation,

            Self::ProfileUnavailable(_) => ErrorKind::ProfileUnavailable,

            Self::Network(_) | Self::Timeout { .. } | Self::InvalidResponse(_) => {
                ErrorKind::NetworkFailure
            }

            Self::BusinessRejection { .. } | Self::FundingAccountUnavailable | Self::PinRejected => {
                ErrorKind::BusinessRejection
            }
        }
    }

    /// The message a collaborator supplied, if any.
    pub fn collaborator_message(&self) -> Option<&str> {
        match self {
            Self::BusinessRejection { message, .. } if !message.trim().is_empty() => {
                Some(message.as_str())
            }
            Self::ProfileUnavailable(message) if !message.trim().is_empty() => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    pub(crate) fn invalid_transition(state: impl fmt::Display, action: &str) -> Self {
        Self::InvalidTransition {
            state: state.to_string(),
            action: action.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidResponse(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
