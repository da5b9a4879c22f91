//! Assignment error taxonomy.
//!
//! `AssignError` is what the engine returns and what the transport layer maps
//! onto a status code. Storage errors (`DatabaseError`) are defined in
//! `dispatch-db` and convert into `AssignError::Upstream` there.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::DispatchStatus;

/// Errors returned by the assignment operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssignError {
    /// Malformed or missing required input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced record does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// The dispatch is in a state the assignment cannot leave from.
    #[error("Invalid state transition: dispatch {id} from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: DispatchStatus,
        to: DispatchStatus,
    },

    /// Concurrent modification kept winning until the retry budget ran out.
    #[error("Conflict: dispatch {id} changed concurrently, gave up after {attempts} attempts")]
    Conflict { id: String, attempts: u32 },

    /// The datastore failed for reasons unrelated to business rules.
    #[error("Upstream failure: {0}")]
    Upstream(String),

    /// The request-scoped deadline elapsed before the assignment completed.
    #[error("Assignment timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

/// Machine-readable error kind carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    InvalidTransition,
    Conflict,
    Upstream,
    Timeout,
}

impl AssignError {
    /// Shorthand for a missing dispatch.
    #[must_use]
    pub fn dispatch_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "dispatch".into(),
            id: id.into(),
        }
    }

    /// Shorthand for a missing vehicle.
    #[must_use]
    pub fn vehicle_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "vehicle".into(),
            id: id.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Upstream(_) => ErrorKind::Upstream,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// HTTP-style status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidArgument(_) => 400,
            Self::NotFound { .. } => 404,
            Self::InvalidTransition { .. } | Self::Conflict { .. } => 409,
            Self::Upstream(_) => 500,
            Self::Timeout { .. } => 504,
        }
    }

    /// Whether the caller may safely resubmit the same request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. } | Self::Upstream(_) | Self::Timeout { .. }
        )
    }
}
