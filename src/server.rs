//! HTTP boundary for browser chat widgets.
//!
//! The server keeps no theme state: each `POST /api/chat` carries the UI's
//! current snapshots, and the reply carries the command for the UI to apply.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::Extension;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::assistant::{Assistant, InboundMessage, OutboundReply};
use crate::error::ConfigError;
use crate::protocol::tool_definitions;

// ── Response types ───────────────────────────────────────────────

#[derive(Serialize)]
struct ApiOk<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct ApiErr {
    ok: bool,
    error: String,
}

fn ok_json<T: Serialize>(data: T) -> impl IntoResponse {
    Json(ApiOk { ok: true, data })
}

fn err_json(status: StatusCode, msg: String) -> impl IntoResponse {
    (status, Json(ApiErr { ok: false, error: msg }))
}

// ── Handlers ─────────────────────────────────────────────────────

async fn post_chat(
    Extension(assistant): Extension<Arc<Assistant>>,
    body: Result<Json<InboundMessage>, JsonRejection>,
) -> impl IntoResponse {
    let Json(inbound) = match body {
        Ok(body) => body,
        Err(rejection) => {
            return err_json(rejection.status(), rejection.body_text()).into_response();
        }
    };
    let reply = match assistant.reply(&inbound).await {
        Ok(reply) => reply,
        Err(err) => {
            tracing::warn!(error = %err, "chat turn failed");
            OutboundReply::text(err.user_message())
        }
    };
    Json(reply).into_response()
}

async fn get_tools() -> impl IntoResponse {
    ok_json(tool_definitions())
}

async fn get_catalog(Extension(assistant): Extension<Arc<Assistant>>) -> impl IntoResponse {
    ok_json(assistant.catalog().clone())
}

// ── Router / startup ─────────────────────────────────────────────

/// CORS policy for `origin`; `*` allows any origin.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let origin = origin.trim();
    if origin == "*" {
        return Ok(CorsLayer::permissive());
    }
    let value = HeaderValue::from_str(origin)
        .map_err(|e| ConfigError::Invalid(format!("invalid server.cors_origin `{origin}`: {e}")))?;
    Ok(CorsLayer::new()
        .allow_origin(value)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}

pub fn router(assistant: Arc<Assistant>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/chat", post(post_chat))
        .route("/api/tools", get(get_tools))
        .route("/api/catalog", get(get_catalog))
        .layer(cors)
        .layer(Extension(assistant))
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await
}
