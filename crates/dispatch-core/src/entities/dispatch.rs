use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::DispatchStatus;

/// A unit of work (e.g. an incident) that must be assigned to a responder.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dispatch {
    pub id: String,
    pub status: DispatchStatus,
    pub assigned_officer_id: Option<String>,
    pub assigned_vehicle_id: Option<String>,
    /// Incremented on every committed write; the compare-and-swap token.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Dispatch {
    /// Whether assigning `officer_id` (and `vehicle_id`, if given) would
    /// leave this record as it is. No vehicle means "keep the current one".
    #[must_use]
    pub fn has_assignment(&self, officer_id: &str, vehicle_id: Option<&str>) -> bool {
        self.assigned_officer_id.as_deref() == Some(officer_id)
            && vehicle_id.is_none_or(|v| self.assigned_vehicle_id.as_deref() == Some(v))
    }
}
