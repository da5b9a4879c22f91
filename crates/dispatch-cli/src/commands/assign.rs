use dispatch_core::requests::AssignRequest;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AssignArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `dispatchd assign`.
pub async fn handle(args: &AssignArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let request = AssignRequest::new(
        args.dispatch_id.as_str(),
        args.officer.as_str(),
        args.vehicle.as_deref(),
        args.actor.as_str(),
    );
    let dispatch = ctx.engine.assign(&request).await?;
    output(&dispatch, flags.format)
}
