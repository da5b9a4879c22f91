use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::VehicleStatus;

/// A vehicle that can be attached to a dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub status: VehicleStatus,
    pub updated_at: DateTime<Utc>,
}
