//! Error types for association operations.
//!
//! Errors are categorized to enable retry decisions and appropriate user
//! feedback. Service errors are classified by their API error code; every
//! variant carries the operation and subject it came from.

use crate::types::AssociationStatus;
use std::time::Duration;
use thiserror::Error;

/// Categories of association errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Configuration rejected before any remote call
    Validation,
    /// Association does not exist
    NotFound,
    /// Creation conflicts with an existing association
    Conflict,
    /// Remote throttling (transient, retryable)
    Throttle,
    /// A bounded wait elapsed before the association converged
    Timeout,
    /// Transport-level failure (transient, retryable)
    Network,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Throttle | Self::Network)
    }

    /// Whether this error can be safely ignored (state already reconciled).
    ///
    /// Not-found is ignorable on delete and steady-state read paths, where
    /// the absence of the association is the desired outcome.
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Validation => "Invalid configuration",
            Self::NotFound => "Association not found",
            Self::Conflict => "Association already exists",
            Self::Throttle => "Request throttled",
            Self::Timeout => "Wait timed out",
            Self::Network => "Network connectivity issue",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Validation => "Fix the named field in the association definition",
            Self::NotFound => "Verify the association id, or recreate the association",
            Self::Conflict => "Delete the existing association or pick a different name",
            Self::Throttle => "Slow down and try again",
            Self::Timeout => "Raise the wait timeout or inspect the association's targets",
            Self::Network => "Check your network connection and AWS endpoint settings",
            Self::Other => "Check the error details for more information",
        }
    }
}

/// Errors that can occur during association operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A configuration field failed validation; no remote call was made.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// What the field must look like
        message: String,
    },

    /// The association does not exist.
    #[error("association not found: {association_id}")]
    NotFound {
        /// Identifier that could not be found
        association_id: String,
    },

    /// An association for this document/target combination already exists.
    #[error("association already exists for document: {name}")]
    AlreadyExists {
        /// Document name the creation was for
        name: String,
    },

    /// The service throttled the request.
    #[error("throttled during {operation}: {message}")]
    Throttled {
        /// Operation that was throttled
        operation: &'static str,
        /// Service-provided detail
        message: String,
    },

    /// A bounded wait elapsed before the desired status was observed.
    #[error("timed out after {waited:?} waiting for association {association_id} to reach {desired}")]
    WaitTimeout {
        /// Association being waited on
        association_id: String,
        /// Status that was never reached
        desired: AssociationStatus,
        /// Total time waited
        waited: Duration,
    },

    /// The association reached a terminal status other than the desired one.
    #[error("association {association_id} reached {status} while waiting for {desired}")]
    UnexpectedStatus {
        /// Association being waited on
        association_id: String,
        /// Terminal status that was observed
        status: AssociationStatus,
        /// Status that was wanted
        desired: AssociationStatus,
    },

    /// No AWS region is configured.
    #[error("no AWS region configured; set AWS_REGION or a profile region")]
    NoRegion,

    /// The request never produced a service response.
    #[error("network error during {operation}: {message}")]
    Network {
        /// Operation that failed
        operation: &'static str,
        /// Transport error detail
        message: String,
    },

    /// The service rejected the request with an unclassified error code.
    #[error("{operation} failed{}: {message}", .code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
    Api {
        /// Operation that failed
        operation: &'static str,
        /// API error code, when the service provided one
        code: Option<String>,
        /// Service-provided detail
        message: String,
    },

    /// A response was missing an attribute the protocol requires.
    #[error("unexpected {operation} response: {message}")]
    UnexpectedResponse {
        /// Operation that produced the response
        operation: &'static str,
        /// What was missing or malformed
        message: String,
    },
}

impl Error {
    /// Create a validation error for a named field.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Classify a service error by its API error code.
    ///
    /// `subject` is the association id (or document name for creation) the
    /// operation was about, used to fill not-found/conflict context.
    pub fn from_api_code(
        operation: &'static str,
        code: Option<&str>,
        message: Option<&str>,
        subject: Option<&str>,
    ) -> Self {
        let subject = subject.unwrap_or("unknown").to_string();
        let message = message.unwrap_or("no message").to_string();

        match code {
            Some("AssociationDoesNotExist") => Self::NotFound {
                association_id: subject,
            },
            Some("AssociationAlreadyExists") => Self::AlreadyExists { name: subject },
            Some("ThrottlingException" | "TooManyUpdates") => Self::Throttled { operation, message },
            _ => Self::Api {
                operation,
                code: code.map(str::to_string),
                message,
            },
        }
    }

    /// Get the error category for retry logic.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Validation { .. } => ErrorCategory::Validation,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::AlreadyExists { .. } => ErrorCategory::Conflict,
            Error::Throttled { .. } => ErrorCategory::Throttle,
            Error::WaitTimeout { .. } => ErrorCategory::Timeout,
            Error::Network { .. } => ErrorCategory::Network,
            Error::UnexpectedStatus { .. }
            | Error::NoRegion
            | Error::Api { .. }
            | Error::UnexpectedResponse { .. } => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Whether this error can be safely ignored.
    pub fn is_ignorable(&self) -> bool {
        self.category().is_ignorable()
    }
}

/// Result type for association operations.
pub type Result<T> = std::result::Result<T, Error>;
