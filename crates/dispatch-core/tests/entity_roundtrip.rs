//! Serde roundtrip and JsonSchema validation tests for the wire types.

use chrono::Utc;
use schemars::schema_for;
use dispatch_core::entities::*;
use dispatch_core::enums::*;
use dispatch_core::errors::{AssignError, ErrorKind};
use dispatch_core::requests::AssignRequest;
use dispatch_core::responses::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    dispatch_roundtrip,
    Dispatch,
    Dispatch {
        id: "dsp-a3f8b2c1".into(),
        status: DispatchStatus::InProgress,
        assigned_officer_id: Some("off-12".into()),
        assigned_vehicle_id: None,
        version: 1,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    vehicle_roundtrip,
    Vehicle,
    Vehicle {
        id: "veh-0c11d2e3".into(),
        status: VehicleStatus::OnRoute,
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    history_entry_roundtrip,
    DispatchHistoryEntry,
    DispatchHistoryEntry {
        id: "dhe-77aa8812".into(),
        dispatch_id: "dsp-a3f8b2c1".into(),
        seq: 1,
        user_id: "user_2abc".into(),
        previous_status: DispatchStatus::Pending,
        new_status: DispatchStatus::InProgress,
        officer_id: Some("off-12".into()),
        vehicle_id: Some("veh-0c11d2e3".into()),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    request_roundtrip,
    AssignRequest,
    AssignRequest::new("dsp-a3f8b2c1", "off-12", None, "user_2abc")
);

roundtrip_and_validate!(
    error_response_roundtrip,
    ErrorResponse,
    ErrorResponse::from(&AssignError::Conflict {
        id: "dsp-a3f8b2c1".into(),
        attempts: 4,
    })
);

roundtrip_and_validate!(
    history_response_roundtrip,
    DispatchHistoryResponse,
    DispatchHistoryResponse {
        dispatch_id: "dsp-a3f8b2c1".into(),
        current_status: DispatchStatus::Pending,
        replayed_status: Some(DispatchStatus::Pending),
        entries: vec![],
    }
);

#[test]
fn dispatch_wire_shape_uses_camel_case() {
    let now = Utc::now();
    let dispatch = Dispatch {
        id: "dsp-1".into(),
        status: DispatchStatus::InProgress,
        assigned_officer_id: Some("off-1".into()),
        assigned_vehicle_id: Some("veh-1".into()),
        version: 2,
        created_at: now,
        updated_at: now,
    };
    let value = serde_json::to_value(&dispatch).unwrap();
    assert_eq!(value["status"], "in-progress");
    assert_eq!(value["assignedOfficerId"], "off-1");
    assert_eq!(value["assignedVehicleId"], "veh-1");
    assert!(value.get("updatedAt").is_some());
}

#[test]
fn error_response_carries_kind_and_retryability() {
    let response = ErrorResponse::from(&AssignError::InvalidArgument("officerId is required".into()));
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["error"]["kind"], "invalid_argument");
    assert_eq!(value["error"]["retryable"], false);
    assert_eq!(response.error.kind, ErrorKind::InvalidArgument);
}
