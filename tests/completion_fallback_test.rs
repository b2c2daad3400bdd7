mod common;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bridvia_assistant::constants::EMPTY_COMPLETION_FALLBACK;
use bridvia_assistant::mock::{candidates, classify};
use bridvia_assistant::*;
use common::*;
use serde_json::{json, Value};
use std::time::Duration;

const COMPLETIONS: &str = "/api/v1/chat/completions";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

async fn strict_upstream(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let headers_ok = header(&headers, "authorization") == Some("Bearer sk-or-test")
        && header(&headers, "http-referer") == Some("https://bridvia.com")
        && header(&headers, "x-title") == Some("Bridvia Platform");
    let body_ok = body["max_tokens"] == 500
        && body["stream"] == false
        && body["stop"].as_array().map(Vec::len) == Some(5)
        && body["messages"][0]["role"] == "system"
        && body["messages"].as_array().map(Vec::len) == Some(12)
        && body["messages"][11]["content"] == "Tell me about BridviaConnect";

    if !(headers_ok && body_ok) {
        return (StatusCode::BAD_REQUEST, "unexpected request").into_response();
    }
    Json(json!({
        "id": "gen-1",
        "choices": [{
            "message": {"role": "assistant", "content": "◁think▷plan the reply◁/think▷Hello! I'm Brid AI."},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 900, "completion_tokens": 12}
    }))
    .into_response()
}

fn is_mock_reply(message: &str, reply: &str) -> bool {
    candidates(classify(message), UserLocation::Main).contains(&reply)
}

#[tokio::test]
async fn test_upstream_reply_is_sanitized() {
    let base = spawn_upstream(Router::new().route(COMPLETIONS, post(strict_upstream))).await;
    let assistant = assistant_for(&base, Duration::from_secs(5));
    let history: Vec<Message> = (0..12)
        .map(|i| Message::user(format!("earlier {}", i)))
        .collect();

    let reply = assistant
        .try_complete("Tell me about BridviaConnect", &history, UserLocation::Main)
        .await
        .unwrap();
    assert_eq!(reply, "Hello! I'm Brid AI.");
}

#[tokio::test]
async fn test_missing_content_uses_fixed_fallback() {
    let router = Router::new().route(
        COMPLETIONS,
        post(|| async { Json(json!({"choices": [{"message": {"role": "assistant"}}]})) }),
    );
    let assistant = assistant_for(&spawn_upstream(router).await, Duration::from_secs(5));

    let reply = assistant
        .generate_response("hello", &[], UserLocation::Main)
        .await;
    assert_eq!(reply, EMPTY_COMPLETION_FALLBACK);
}

#[tokio::test]
async fn test_error_status_falls_back_to_mock() {
    let router = Router::new().route(
        COMPLETIONS,
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
    );
    let assistant = assistant_for(&spawn_upstream(router).await, Duration::from_secs(5));

    let err = assistant
        .try_complete("hello", &[], UserLocation::Main)
        .await
        .unwrap_err();
    assert!(matches!(err.inner, AssistantError::Upstream(s, _) if s == StatusCode::TOO_MANY_REQUESTS));

    let reply = assistant
        .generate_response("hello", &[], UserLocation::Main)
        .await;
    assert!(is_mock_reply("hello", &reply));
}

#[tokio::test]
async fn test_malformed_body_falls_back_to_mock() {
    let router = Router::new().route(COMPLETIONS, post(|| async { "definitely not json" }));
    let assistant = assistant_for(&spawn_upstream(router).await, Duration::from_secs(5));

    let message = "What does it cost?";
    let reply = assistant
        .generate_response(message, &[], UserLocation::Main)
        .await;
    assert!(is_mock_reply(message, &reply));
}

#[tokio::test]
async fn test_slow_upstream_times_out_into_mock() {
    let router = Router::new().route(
        COMPLETIONS,
        post(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(json!({"choices": [{"message": {"content": "too late"}}]}))
        }),
    );
    let assistant = assistant_for(&spawn_upstream(router).await, Duration::from_millis(200));

    let err = assistant
        .try_complete("hello", &[], UserLocation::Main)
        .await
        .unwrap_err();
    assert!(matches!(err.inner, AssistantError::Timeout(_)));

    let started = std::time::Instant::now();
    let reply = assistant
        .generate_response("hello", &[], UserLocation::Main)
        .await;
    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(is_mock_reply("hello", &reply));
}

#[tokio::test]
async fn test_network_error_never_propagates() {
    let assistant = assistant_for("http://127.0.0.1:1/api/v1", Duration::from_secs(5));

    let reply = assistant
        .generate_response("tell me about job placements", &[], UserLocation::Main)
        .await;
    assert!(!reply.trim().is_empty());
    assert!(reply.contains("not job placements"));
}
