mod create;
mod get;
mod history;
mod list;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DispatchCommands;
use crate::context::AppContext;

/// Handle `dispatchd dispatch`.
pub async fn handle(
    action: &DispatchCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DispatchCommands::Create => create::run(ctx, flags).await,
        DispatchCommands::Get { id } => get::run(id, ctx, flags).await,
        DispatchCommands::List { status } => list::run(status.as_deref(), ctx, flags).await,
        DispatchCommands::History { id } => history::run(id, ctx, flags).await,
    }
}
