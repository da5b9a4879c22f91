//! `tiny_http` server for the assignment endpoint.
//!
//! `tiny_http` is blocking: `recv()`, body reads and `respond()` run on the
//! blocking pool, while routing and the assignment itself run as tokio tasks.

mod router;

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use tiny_http::{Header, Request, Response, Server};

pub use router::{Reply, route};

use crate::context::AppContext;

/// Serve until Ctrl-C.
pub async fn serve(ctx: Arc<AppContext>, bind: &str) -> anyhow::Result<()> {
    let server = Arc::new(
        Server::http(bind).map_err(|e| anyhow::anyhow!("failed to bind {bind}: {e}"))?,
    );
    let max_body_bytes = ctx.config.server.max_body_bytes;
    tracing::info!(addr = ?server.server_addr(), "dispatch endpoint listening");

    loop {
        let srv = Arc::clone(&server);
        let next = tokio::task::spawn_blocking(move || srv.recv());

        let request = tokio::select! {
            joined = next => joined
                .context("spawn_blocking join")?
                .context("failed to receive request")?,
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl-C")?;
                server.unblock();
                tracing::info!("shutting down dispatch endpoint");
                return Ok(());
            }
        };

        let ctx = Arc::clone(&ctx);
        tokio::spawn(async move {
            if let Err(error) = handle(&ctx, request, max_body_bytes).await {
                tracing::warn!(%error, "failed to handle request");
            }
        });
    }
}

async fn handle(ctx: &AppContext, request: Request, max_body_bytes: usize) -> anyhow::Result<()> {
    let (request, body) = tokio::task::spawn_blocking(move || {
        let mut request = request;
        let body = read_body(&mut request, max_body_bytes);
        (request, body)
    })
    .await
    .context("spawn_blocking join")?;

    let reply = match body {
        Ok(Some(body)) => {
            let method = request.method().clone();
            let url = request.url().to_string();
            let reply = route(ctx, &method, &url, &body).await;
            tracing::debug!(%method, %url, status = reply.status, "handled request");
            reply
        }
        Ok(None) => Reply::payload_too_large(max_body_bytes),
        Err(error) => {
            tracing::warn!(%error, "failed to read request body");
            return Ok(());
        }
    };

    tokio::task::spawn_blocking(move || respond(request, reply))
        .await
        .context("spawn_blocking join")?
}

/// Read at most `limit` bytes. `Ok(None)` if the body is larger.
fn read_body(request: &mut Request, limit: usize) -> std::io::Result<Option<Vec<u8>>> {
    if request.body_length().is_some_and(|len| len > limit) {
        return Ok(None);
    }
    let mut body = Vec::new();
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    request.as_reader().take(cap).read_to_end(&mut body)?;
    if body.len() > limit {
        return Ok(None);
    }
    Ok(Some(body))
}

fn respond(request: Request, reply: Reply) -> anyhow::Result<()> {
    let mut response = Response::from_string(reply.body.unwrap_or_default())
        .with_status_code(reply.status);
    for (name, value) in [
        ("Content-Type", "application/json"),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
        ("Access-Control-Allow-Headers", "content-type"),
    ] {
        let header = Header::from_bytes(name, value)
            .map_err(|()| anyhow::anyhow!("invalid header {name}"))?;
        response.add_header(header);
    }
    request.respond(response).context("failed to write response")
}
