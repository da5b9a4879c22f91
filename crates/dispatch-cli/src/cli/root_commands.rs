use clap::{Args, Subcommand};

use crate::cli::subcommands::{DispatchCommands, VehicleCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP assignment endpoint.
    Serve(ServeArgs),
    /// Assign an officer (and optionally a vehicle) to a dispatch.
    Assign(AssignArgs),
    /// Dispatches.
    Dispatch {
        #[command(subcommand)]
        action: DispatchCommands,
    },
    /// Vehicles.
    Vehicle {
        #[command(subcommand)]
        action: VehicleCommands,
    },
    /// Print the JSON Schema of a wire type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Listen address, overriding `server.bind` from config
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AssignArgs {
    /// Dispatch ID
    pub dispatch_id: String,
    #[arg(long)]
    pub officer: String,
    #[arg(long)]
    pub vehicle: Option<String>,
    /// User performing the assignment (recorded in history)
    #[arg(long)]
    pub actor: String,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// One of: dispatch, vehicle, history-entry, assign-request,
    /// error-response, history-response
    pub type_name: String,
}
