use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DispatchStatus;

/// An append-only audit record of one committed assignment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DispatchHistoryEntry {
    pub id: String,
    pub dispatch_id: String,
    /// Dispatch version produced by this entry. Unique per dispatch.
    pub seq: i64,
    /// The actor who performed the assignment.
    pub user_id: String,
    pub previous_status: DispatchStatus,
    pub new_status: DispatchStatus,
    pub officer_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
