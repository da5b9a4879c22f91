pub mod assign;
pub mod dispatch;
pub mod schema;
pub mod serve;
pub mod shared;
pub mod vehicle;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::context::AppContext;

/// Route a parsed command to the corresponding handler module.
pub async fn handle(command: Commands, ctx: AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Serve(args) => serve::handle(&args, ctx).await,
        Commands::Assign(args) => assign::handle(&args, &ctx, flags).await,
        Commands::Dispatch { action } => dispatch::handle(&action, &ctx, flags).await,
        Commands::Vehicle { action } => vehicle::handle(&action, &ctx, flags).await,
        Commands::Schema(args) => schema::handle(&args, flags),
    }
}
