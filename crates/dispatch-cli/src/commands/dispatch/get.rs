use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let dispatch = ctx
        .db()
        .get_dispatch(id)
        .await
        .with_context(|| format!("dispatch {id}"))?;
    output(&dispatch, flags.format)
}
