//! Assignment request as received from the transport layer, and its
//! validated form.
//!
//! Every field on the wire type is optional so that a missing field surfaces
//! as `AssignError::InvalidArgument` rather than a deserialization failure.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::AssignError;

/// Request body for the assignment operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[serde(default)]
    pub dispatch_id: Option<String>,
    #[serde(default)]
    pub officer_id: Option<String>,
    #[serde(default)]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub actor_user_id: Option<String>,
}

/// A structurally valid assignment. Identifiers are trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignCommand {
    pub dispatch_id: String,
    pub officer_id: String,
    pub vehicle_id: Option<String>,
    pub actor_user_id: String,
}

impl AssignRequest {
    /// Build a request from its four parts.
    #[must_use]
    pub fn new(
        dispatch_id: impl Into<String>,
        officer_id: impl Into<String>,
        vehicle_id: Option<&str>,
        actor_user_id: impl Into<String>,
    ) -> Self {
        Self {
            dispatch_id: Some(dispatch_id.into()),
            officer_id: Some(officer_id.into()),
            vehicle_id: vehicle_id.map(String::from),
            actor_user_id: Some(actor_user_id.into()),
        }
    }

    /// Validate without touching any datastore.
    ///
    /// # Errors
    ///
    /// Returns `AssignError::InvalidArgument` if `dispatchId`, `officerId` or
    /// `actorUserId` is missing or blank.
    pub fn validate(&self) -> Result<AssignCommand, AssignError> {
        Ok(AssignCommand {
            dispatch_id: required("dispatchId", self.dispatch_id.as_deref())?,
            officer_id: required("officerId", self.officer_id.as_deref())?,
            vehicle_id: optional(self.vehicle_id.as_deref()),
            actor_user_id: required("actorUserId", self.actor_user_id.as_deref())?,
        })
    }
}

fn required(field: &str, value: Option<&str>) -> Result<String, AssignError> {
    optional(value).ok_or_else(|| AssignError::InvalidArgument(format!("{field} is required")))
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn valid_request_is_trimmed() {
        let cmd = AssignRequest::new(" dsp-1 ", "off-7", Some(" veh-2"), "user_abc")
            .validate()
            .unwrap();
        assert_eq!(
            cmd,
            AssignCommand {
                dispatch_id: "dsp-1".into(),
                officer_id: "off-7".into(),
                vehicle_id: Some("veh-2".into()),
                actor_user_id: "user_abc".into(),
            }
        );
    }

    #[test]
    fn blank_vehicle_is_absent() {
        let cmd = AssignRequest::new("dsp-1", "off-7", Some("  "), "user_abc")
            .validate()
            .unwrap();
        assert_eq!(cmd.vehicle_id, None);
    }

    #[test]
    fn missing_fields_are_rejected() {
        let cases = [
            (AssignRequest { dispatch_id: None, ..AssignRequest::new("x", "off", None, "u") }, "dispatchId"),
            (AssignRequest { officer_id: Some("   ".into()), ..AssignRequest::new("dsp", "x", None, "u") }, "officerId"),
            (AssignRequest { actor_user_id: None, ..AssignRequest::new("dsp", "off", None, "x") }, "actorUserId"),
        ];
        for (request, field) in cases {
            let err = request.validate().unwrap_err();
            assert_eq!(err, AssignError::InvalidArgument(format!("{field} is required")));
        }
    }

    #[test]
    fn deserializes_camel_case_with_missing_fields() {
        let request: AssignRequest =
            serde_json::from_str(r#"{"dispatchId":"dsp-1","vehicleId":null}"#).unwrap();
        assert_eq!(request.dispatch_id.as_deref(), Some("dsp-1"));
        assert_eq!(request.officer_id, None);
        assert_eq!(request.vehicle_id, None);
    }
}
