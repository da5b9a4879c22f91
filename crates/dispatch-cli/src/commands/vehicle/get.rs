use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let vehicle = ctx
        .db()
        .get_vehicle(id)
        .await
        .with_context(|| format!("vehicle {id}"))?;
    output(&vehicle, flags.format)
}
