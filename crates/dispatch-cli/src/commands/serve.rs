use std::sync::Arc;

use crate::cli::root_commands::ServeArgs;
use crate::context::AppContext;
use crate::http;

/// Handle `dispatchd serve`.
pub async fn handle(args: &ServeArgs, ctx: AppContext) -> anyhow::Result<()> {
    let bind = args
        .bind
        .clone()
        .unwrap_or_else(|| ctx.config.server.bind.clone());
    http::serve(Arc::new(ctx), &bind).await
}
