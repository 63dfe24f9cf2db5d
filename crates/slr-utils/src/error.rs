//! Core error taxonomy shared across the pipeline.
//!
//! `SlrError` is the error type returned by library operations in every
//! `slr-*` crate. It groups failures into the categories the orchestrator's
//! external API surfaces (see the error taxonomy in the system's external
//! interface contract): validation, not-found, precondition, provider,
//! rate-limiting, timeout, I/O, and internal.

use std::fmt;
use thiserror::Error;

/// Primary error type returned by pipeline operations.
///
/// Library code returns `SlrError` and never calls `std::process::exit()`;
/// the CLI layer is responsible for mapping errors to exit codes via
/// [`crate::exit_codes::ExitCode`].
#[derive(Error, Debug)]
pub enum SlrError {
    /// Input failed a structural or semantic check (missing fields, illegal
    /// transition, unknown stage/dialect name). Never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Requested artifact, project, or stage does not exist.
    #[error("not found: {kind} {id}")]
    NotFound { kind: String, id: String },

    /// A stage was asked to run while one or more required upstream
    /// artifacts are not in an approved state.
    #[error("precondition failed: requires {0:?}")]
    PreconditionFailed(Vec<String>),

    /// A search provider returned an error. `retriable` reflects whether the
    /// executor's retry policy should still be attempting this call (false
    /// once the retry budget is exhausted or the failure is permanent).
    #[error("provider '{provider_name}' error: {message}")]
    Provider {
        provider_name: String,
        message: String,
        retriable: bool,
    },

    /// A provider's rate limiter rejected the call, or the provider
    /// returned HTTP 429 with a `Retry-After` hint.
    #[error("provider '{provider_name}' rate limited, retry after {retry_after_seconds}s")]
    RateLimited {
        provider_name: String,
        retry_after_seconds: u64,
    },

    /// A call (provider request or overall executor run) exceeded its
    /// deadline.
    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Persisting or reading artifact/result state failed at the
    /// filesystem layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An artifact file exists but failed to parse.
    #[error("corrupt artifact at {path}: {reason}")]
    Corrupt { path: String, reason: String },

    /// Catch-all for invariants that should be unreachable in correct code.
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, SlrError>;

impl SlrError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    pub fn precondition_failed(missing: Vec<String>) -> Self {
        Self::PreconditionFailed(missing)
    }

    /// Returns the error category used for logging and exit-code mapping.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::PreconditionFailed(_) => ErrorCategory::Precondition,
            Self::Provider { .. } => ErrorCategory::Provider,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Io(_) | Self::Corrupt { .. } => ErrorCategory::Storage,
            Self::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// True when the orchestrator should treat this as advisory (a warning
    /// attached to a partially-successful stage result) rather than fatal.
    #[must_use]
    pub fn is_advisory(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. } | Self::RateLimited { .. } | Self::Timeout(_)
        )
    }
}

/// Coarse-grained category used for log fields and exit-code mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Precondition,
    Provider,
    RateLimit,
    Timeout,
    Storage,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::NotFound => write!(f, "not_found"),
            Self::Precondition => write!(f, "precondition"),
            Self::Provider => write!(f, "provider"),
            Self::RateLimit => write!(f, "rate_limit"),
            Self::Timeout => write!(f, "timeout"),
            Self::Storage => write!(f, "storage"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
