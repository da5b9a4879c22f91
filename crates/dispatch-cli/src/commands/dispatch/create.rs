use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let dispatch = ctx.db().create_dispatch().await?;
    output(&dispatch, flags.format)
}
