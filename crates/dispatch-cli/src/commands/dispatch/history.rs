use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let view = ctx
        .db()
        .history_view(id)
        .await
        .with_context(|| format!("history for dispatch {id}"))?;
    output(&view, flags.format)
}
