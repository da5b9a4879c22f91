use dispatch_core::enums::DispatchStatus;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(status: Option<&str>, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let status = status
        .map(|raw| parse_enum::<DispatchStatus>(raw, "status"))
        .transpose()?;
    let dispatches = ctx
        .db()
        .list_dispatches(status, effective_limit(flags.limit, 20))
        .await?;
    output(&dispatches, flags.format)
}
