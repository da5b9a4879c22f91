//! Response types returned as JSON by the endpoint and the `dispatchd` CLI.
//!
//! A successful assignment returns the `Dispatch` record itself; these types
//! cover errors and the history view.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::DispatchHistoryEntry;
use crate::enums::DispatchStatus;
use crate::errors::{AssignError, ErrorKind};

/// Structured error payload.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

/// Envelope for every error response: `{ "error": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl From<&AssignError> for ErrorResponse {
    fn from(err: &AssignError) -> Self {
        Self {
            error: ErrorBody {
                kind: err.kind(),
                message: err.to_string(),
                retryable: err.is_retryable(),
            },
        }
    }
}

/// Response from `GET /dispatches/{id}/history` and `dispatchd dispatch history`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DispatchHistoryResponse {
    pub dispatch_id: String,
    pub current_status: DispatchStatus,
    /// Status obtained by replaying `entries`; `None` if the chain is broken.
    pub replayed_status: Option<DispatchStatus>,
    pub entries: Vec<DispatchHistoryEntry>,
}
