mod add;
mod get;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::VehicleCommands;
use crate::context::AppContext;

/// Handle `dispatchd vehicle`.
pub async fn handle(
    action: &VehicleCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        VehicleCommands::Add { id, status } => add::run(id.as_deref(), status, ctx, flags).await,
        VehicleCommands::Get { id } => get::run(id, ctx, flags).await,
    }
}
