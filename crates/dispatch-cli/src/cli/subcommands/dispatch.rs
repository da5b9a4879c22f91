use clap::Subcommand;

/// Dispatch entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DispatchCommands {
    /// Create a pending dispatch.
    Create,
    /// Get a dispatch by ID.
    Get { id: String },
    /// List dispatches, most recently updated first.
    List {
        #[arg(long)]
        status: Option<String>,
    },
    /// Show a dispatch's history and its replayed status.
    History { id: String },
}
