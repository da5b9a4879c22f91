use anyhow::bail;
use schemars::schema_for;

use dispatch_core::entities::{Dispatch, DispatchHistoryEntry, Vehicle};
use dispatch_core::requests::AssignRequest;
use dispatch_core::responses::{DispatchHistoryResponse, ErrorResponse};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Wire types `dispatchd schema` can describe.
pub const TYPE_NAMES: [&str; 6] = [
    "dispatch",
    "vehicle",
    "history-entry",
    "assign-request",
    "error-response",
    "history-response",
];

/// JSON Schema for one wire type, or `None` if the name is unknown.
pub fn schema_for_name(type_name: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let schema = match type_name {
        "dispatch" => schema_for!(Dispatch),
        "vehicle" => schema_for!(Vehicle),
        "history-entry" => schema_for!(DispatchHistoryEntry),
        "assign-request" => schema_for!(AssignRequest),
        "error-response" => schema_for!(ErrorResponse),
        "history-response" => schema_for!(DispatchHistoryResponse),
        _ => return Ok(None),
    };
    Ok(Some(serde_json::to_value(schema)?))
}

/// Handle `dispatchd schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(schema) = schema_for_name(args.type_name.trim())? else {
        bail!(
            "unknown type '{}' (expected one of: {})",
            args.type_name,
            TYPE_NAMES.join(", ")
        );
    };
    output(&schema, flags.format)
}
