//! Request routing for the assignment endpoint.
//!
//! `route` maps (method, url, body) to a [`Reply`] without touching sockets,
//! so every route and error mapping is testable in-process.

use serde::Serialize;
use tiny_http::Method;

use dispatch_core::errors::{AssignError, ErrorKind};
use dispatch_core::requests::AssignRequest;
use dispatch_core::responses::{ErrorBody, ErrorResponse};
use dispatch_db::error::DatabaseError;

use crate::context::AppContext;

/// Status code and optional JSON body for one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: Option<String>,
}

impl Reply {
    pub const fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status,
                body: Some(body),
            },
            Err(error) => {
                tracing::error!(%error, "failed to serialize response body");
                Self {
                    status: 500,
                    body: Some(
                        r#"{"error":{"kind":"upstream","message":"response serialization failed","retryable":true}}"#
                            .into(),
                    ),
                }
            }
        }
    }

    pub fn from_error(err: &AssignError) -> Self {
        Self::json(err.status_code(), &ErrorResponse::from(err))
    }

    fn plain_error(status: u16, kind: ErrorKind, message: String) -> Self {
        Self::json(
            status,
            &ErrorResponse {
                error: ErrorBody {
                    kind,
                    message,
                    retryable: false,
                },
            },
        )
    }

    pub fn payload_too_large(limit: usize) -> Self {
        Self::plain_error(
            413,
            ErrorKind::InvalidArgument,
            format!("request body exceeds {limit} bytes"),
        )
    }
}

/// Route one request.
pub async fn route(ctx: &AppContext, method: &Method, url: &str, body: &[u8]) -> Reply {
    if *method == Method::Options {
        return Reply::no_content();
    }

    let path = url.split_once('?').map_or(url, |(path, _)| path);
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method, segments.as_slice()) {
        (Method::Post, ["assignments"]) => assign(ctx, body).await,
        (Method::Get, ["dispatches", id]) => match ctx.db().get_dispatch(id).await {
            Ok(dispatch) => Reply::json(200, &dispatch),
            Err(err) => Reply::from_error(&lookup_error(err, id)),
        },
        (Method::Get, ["dispatches", id, "history"]) => match ctx.db().history_view(id).await {
            Ok(view) => Reply::json(200, &view),
            Err(err) => Reply::from_error(&lookup_error(err, id)),
        },
        (_, ["assignments"] | ["dispatches", _] | ["dispatches", _, "history"]) => {
            Reply::plain_error(
                405,
                ErrorKind::InvalidArgument,
                format!("method {method} not allowed on {path}"),
            )
        }
        _ => Reply::plain_error(404, ErrorKind::NotFound, format!("no route for {path}")),
    }
}

async fn assign(ctx: &AppContext, body: &[u8]) -> Reply {
    let request: AssignRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(error) => {
            return Reply::from_error(&AssignError::InvalidArgument(format!(
                "malformed JSON body: {error}"
            )));
        }
    };

    match ctx.engine.assign(&request).await {
        Ok(dispatch) => Reply::json(200, &dispatch),
        Err(err) => {
            if matches!(err, AssignError::Upstream(_)) {
                tracing::error!(error = %err, "assignment failed");
            } else {
                tracing::debug!(error = %err, "assignment rejected");
            }
            Reply::from_error(&err)
        }
    }
}

fn lookup_error(err: DatabaseError, id: &str) -> AssignError {
    match err {
        DatabaseError::NoResult => AssignError::dispatch_not_found(id),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use dispatch_config::DispatchConfig;
    use dispatch_core::entities::Dispatch;
    use dispatch_core::enums::DispatchStatus;
    use dispatch_core::responses::DispatchHistoryResponse;
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;

    async fn test_ctx() -> AppContext {
        let mut config = DispatchConfig::default();
        config.database.path = ":memory:".into();
        AppContext::init(config).await.unwrap()
    }

    fn body_json(reply: &Reply) -> Value {
        serde_json::from_str(reply.body.as_deref().expect("reply should have a body")).unwrap()
    }

    fn assign_body(dispatch_id: &str, officer_id: &str) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "dispatchId": dispatch_id,
            "officerId": officer_id,
            "vehicleId": null,
            "actorUserId": "user_dispatcher",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn preflight_is_no_content() {
        let ctx = test_ctx().await;
        let reply = route(&ctx, &Method::Options, "/assignments", b"").await;
        assert_eq!(reply, Reply::no_content());

        let reply = route(&ctx, &Method::Options, "/anything/at/all", b"").await;
        assert_eq!(reply.status, 204);
    }

    #[tokio::test]
    async fn assignment_returns_updated_dispatch() {
        let ctx = test_ctx().await;
        let dispatch = ctx.db().create_dispatch().await.unwrap();

        let reply = route(
            &ctx,
            &Method::Post,
            "/assignments",
            &assign_body(&dispatch.id, "off-9"),
        )
        .await;
        assert_eq!(reply.status, 200);

        let updated: Dispatch = serde_json::from_str(reply.body.as_deref().unwrap()).unwrap();
        assert_eq!(updated.status, DispatchStatus::InProgress);
        assert_eq!(updated.assigned_officer_id.as_deref(), Some("off-9"));

        let value = body_json(&reply);
        assert_eq!(value["status"], "in-progress");
        assert!(value.get("assignedVehicleId").is_some());
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let ctx = test_ctx().await;
        let reply = route(&ctx, &Method::Post, "/assignments", b"{not json").await;

        assert_eq!(reply.status, 400);
        let value = body_json(&reply);
        assert_eq!(value["error"]["kind"], "invalid_argument");
        assert_eq!(value["error"]["retryable"], false);
    }

    #[tokio::test]
    async fn missing_officer_is_bad_request() {
        let ctx = test_ctx().await;
        let body = serde_json::to_vec(&json!({
            "dispatchId": "dsp-1",
            "actorUserId": "user_dispatcher",
        }))
        .unwrap();

        let reply = route(&ctx, &Method::Post, "/assignments", &body).await;
        assert_eq!(reply.status, 400);
        assert_eq!(
            body_json(&reply)["error"]["message"],
            "Invalid argument: officerId is required"
        );
    }

    #[tokio::test]
    async fn unknown_dispatch_maps_to_not_found() {
        let ctx = test_ctx().await;

        let reply = route(
            &ctx,
            &Method::Post,
            "/assignments",
            &assign_body("dsp-missing", "off-1"),
        )
        .await;
        assert_eq!(reply.status, 404);
        assert_eq!(body_json(&reply)["error"]["kind"], "not_found");

        let reply = route(&ctx, &Method::Get, "/dispatches/dsp-missing", b"").await;
        assert_eq!(reply.status, 404);
    }

    #[tokio::test]
    async fn terminal_dispatch_maps_to_conflict_status() {
        let ctx = test_ctx().await;
        let now = chrono::Utc::now();
        ctx.db()
            .insert_dispatch(&Dispatch {
                id: "dsp-done0001".into(),
                status: DispatchStatus::Completed,
                assigned_officer_id: Some("off-1".into()),
                assigned_vehicle_id: None,
                version: 1,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap();

        let reply = route(
            &ctx,
            &Method::Post,
            "/assignments",
            &assign_body("dsp-done0001", "off-2"),
        )
        .await;
        assert_eq!(reply.status, 409);
        assert_eq!(body_json(&reply)["error"]["kind"], "invalid_transition");
    }

    #[tokio::test]
    async fn get_dispatch_and_history() {
        let ctx = test_ctx().await;
        let dispatch = ctx.db().create_dispatch().await.unwrap();
        route(
            &ctx,
            &Method::Post,
            "/assignments",
            &assign_body(&dispatch.id, "off-1"),
        )
        .await;

        let reply = route(&ctx, &Method::Get, &format!("/dispatches/{}", dispatch.id), b"").await;
        assert_eq!(reply.status, 200);
        assert_eq!(body_json(&reply)["assignedOfficerId"], "off-1");

        let reply = route(
            &ctx,
            &Method::Get,
            &format!("/dispatches/{}/history?verbose=1", dispatch.id),
            b"",
        )
        .await;
        assert_eq!(reply.status, 200);
        let view: DispatchHistoryResponse =
            serde_json::from_str(reply.body.as_deref().unwrap()).unwrap();
        assert_eq!(view.entries.len(), 1);
        assert_eq!(view.replayed_status, Some(DispatchStatus::InProgress));
    }

    #[tokio::test]
    async fn wrong_method_and_unknown_path() {
        let ctx = test_ctx().await;

        let reply = route(&ctx, &Method::Get, "/assignments", b"").await;
        assert_eq!(reply.status, 405);

        let reply = route(&ctx, &Method::Delete, "/dispatches/dsp-1", b"").await;
        assert_eq!(reply.status, 405);

        let reply = route(&ctx, &Method::Get, "/officers", b"").await;
        assert_eq!(reply.status, 404);
        assert_eq!(body_json(&reply)["error"]["kind"], "not_found");
    }

    #[test]
    fn oversized_body_reply() {
        let reply = Reply::payload_too_large(16);
        assert_eq!(reply.status, 413);
        assert_eq!(
            body_json(&reply)["error"]["message"],
            "request body exceeds 16 bytes"
        );
    }
}
