//! ID prefixes for records created by this workspace.
//!
//! IDs have the form `{prefix}-{8 hex chars}`, generated in SQL.

pub const PREFIX_DISPATCH: &str = "dsp";
pub const PREFIX_VEHICLE: &str = "veh";
pub const PREFIX_HISTORY: &str = "dhe";

pub const ALL_PREFIXES: &[&str] = &[PREFIX_DISPATCH, PREFIX_VEHICLE, PREFIX_HISTORY];
