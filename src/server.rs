//! HTTP surface of the assistant: the chat endpoints the widget calls, the
//! welcome-context lookup and the health probes.

use crate::health;
use crate::ingress::{ChatRequest, RawChatRequest};
use crate::logging::{log_request_summary, request_id_middleware};
use crate::types::*;
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::http::{header, Method};
use axum::response::sse::{Event, KeepAlive};
use axum::response::{IntoResponse, Response, Sse};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: String,
    pub user_location: UserLocation,
    pub session_id: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContextQuery {
    #[serde(default)]
    pub user_location: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponse {
    pub user_location: UserLocation,
    pub welcome_message: &'static str,
    pub placeholder: &'static str,
}

/// ISO-8601 UTC with millisecond precision, e.g. `2025-01-31T09:15:02.123Z`.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn read_payload(
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<RawChatRequest> {
    match payload {
        Ok(Json(value)) => RawChatRequest::from_value(value),
        Err(rejection) => {
            tracing::warn!("[🌐 -> ⚙️ ] Unreadable body: {}", rejection.body_text());
            Err(AssistantError::InvalidRequest(rejection.body_text()).into())
        }
    }
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Json<ChatResponse>> {
    let request: ChatRequest = read_payload(payload)?.validate_strict()?;
    log_request_summary(&request, false);

    let response = state
        .assistant
        .generate_response(&request.message, &request.history, request.location)
        .await;

    tracing::info!("[⚙️  -> 🌐] Reply: {} chars", response.len());
    Ok(Json(ChatResponse {
        response,
        timestamp: timestamp(),
        user_location: request.location,
        session_id: request.session_id.unwrap_or_else(|| "unknown".to_string()),
    }))
}

/// JSON body of one SSE frame. Error chunks keep their fallback `content` so
/// the widget still has something to show.
pub fn chunk_payload(chunk: &StreamChunk) -> serde_json::Value {
    match chunk {
        StreamChunk::Error { error, content } => serde_json::json!({
            "error": error,
            "content": content,
            "timestamp": timestamp(),
        }),
        other => serde_json::json!({
            "content": other.content(),
            "timestamp": timestamp(),
        }),
    }
}

pub fn chunk_event(chunk: &StreamChunk) -> Event {
    Event::default().data(chunk_payload(chunk).to_string())
}

pub async fn chat_stream(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    let request = match read_payload(payload).and_then(RawChatRequest::validate_lenient) {
        Ok(r) => r,
        Err(e) => return e.into_response(),
    };
    log_request_summary(&request, true);

    let chunks = state
        .assistant
        .clone()
        .generate_stream(request.message, request.history, request.location);
    let events = chunks.map(|chunk| Ok::<_, Infallible>(chunk_event(&chunk)));

    Sse::new(events)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("keepalive"),
        )
        .into_response()
}

pub async fn context(Query(query): Query<ContextQuery>) -> Json<ContextResponse> {
    let location = match query.user_location.as_deref() {
        Some(s) => UserLocation::parse_lenient(s),
        None => UserLocation::default(),
    };
    Json(ContextResponse {
        user_location: location,
        welcome_message: location.welcome(),
        placeholder: location.placeholder(),
    })
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/chat/stream", post(chat_stream))
        .route("/api/chat/context", get(context))
        .route("/health", get(health::liveness))
        .route("/readyz", get(health::readiness))
        .layer(DefaultBodyLimit::max(state.args.max_body_size))
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
