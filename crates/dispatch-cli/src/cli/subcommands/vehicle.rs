use clap::Subcommand;

/// Vehicle entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum VehicleCommands {
    /// Register a vehicle.
    Add {
        /// Vehicle ID (generated if omitted)
        #[arg(long)]
        id: Option<String>,
        #[arg(long, default_value = "available")]
        status: String,
    },
    /// Get a vehicle by ID.
    Get { id: String },
}
