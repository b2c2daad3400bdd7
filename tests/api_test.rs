use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use bridvia_assistant::completion::{BridAssistant, UpstreamConfig};
use bridvia_assistant::constants::DONE_TOKEN;
use bridvia_assistant::mock::{candidates, MockTopic};
use bridvia_assistant::server::build_router;
use bridvia_assistant::*;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

fn mock_app() -> Router {
    let assistant = BridAssistant::new(reqwest::Client::new(), UpstreamConfig::default());
    build_router(Arc::new(AppState::new(assistant, Args::default())))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_empty_message_is_rejected() {
    for body in [json!({"message": ""}), json!({}), json!({"message": 7})] {
        let response = mock_app().oneshot(post_json("/api/chat", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Message is required and must be a string");
    }
}

#[tokio::test]
async fn test_stream_endpoint_validates_message_too() {
    let response = mock_app()
        .oneshot(post_json("/api/chat/stream", json!({"message": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_invalid_location_is_rejected() {
    let response = mock_app()
        .oneshot(post_json(
            "/api/chat",
            json!({"message": "hello", "userLocation": "careers"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid user location");
}

#[tokio::test]
async fn test_unparseable_body_is_a_client_error() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = mock_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hello_gets_a_greeting() {
    let response = mock_app()
        .oneshot(post_json(
            "/api/chat",
            json!({"message": "hello", "userLocation": "main", "sessionId": "s-42"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    let reply = json["response"].as_str().unwrap();
    assert!(candidates(MockTopic::Greeting, UserLocation::Main).contains(&reply));
    assert_eq!(json["userLocation"], "main");
    assert_eq!(json["sessionId"], "s-42");
    assert!(chrono::DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_missing_session_is_reported_as_unknown() {
    let response = mock_app()
        .oneshot(post_json(
            "/api/chat",
            json!({"message": "Is BridviaConnect phase 1?", "userLocation": "bridvia-connect"}),
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["sessionId"], "unknown");
    assert_eq!(json["userLocation"], "bridvia-connect");
    let reply = json["response"].as_str().unwrap();
    assert!(candidates(MockTopic::BridviaConnect, UserLocation::BridviaConnect).contains(&reply));
}

#[tokio::test]
async fn test_stream_endpoint_emits_sse_frames() {
    let response = mock_app()
        .oneshot(post_json(
            "/api/chat/stream",
            json!({"message": "hello", "userLocation": "somewhere-else"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    let frames: Vec<Value> = text
        .lines()
        .filter_map(|l| l.strip_prefix("data:"))
        .map(|d| serde_json::from_str(d.trim()).unwrap())
        .collect();

    assert!(frames.len() > 2);
    assert!(frames.iter().all(|f| f["timestamp"].is_string()));
    assert_eq!(frames.last().unwrap()["content"], DONE_TOKEN);

    let reply: String = frames[..frames.len() - 1]
        .iter()
        .map(|f| f["content"].as_str().unwrap().to_string())
        .collect();
    assert!(candidates(MockTopic::Greeting, UserLocation::Main).contains(&reply.as_str()));
}

#[tokio::test]
async fn test_context_endpoint_returns_location_copy() {
    let request = Request::builder()
        .uri("/api/chat/context?userLocation=bridvia-connect")
        .body(Body::empty())
        .unwrap();
    let json = body_json(mock_app().oneshot(request).await.unwrap()).await;
    assert_eq!(json["userLocation"], "bridvia-connect");
    assert!(json["welcomeMessage"].as_str().unwrap().contains("BridviaConnect"));
    assert!(json["placeholder"].as_str().unwrap().starts_with("Ask Brid AI"));

    let request = Request::builder()
        .uri("/api/chat/context")
        .body(Body::empty())
        .unwrap();
    let json = body_json(mock_app().oneshot(request).await.unwrap()).await;
    assert_eq!(json["userLocation"], "main");
}

#[tokio::test]
async fn test_cors_preflight() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/chat")
        .header("origin", "https://bridvia.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    let response = mock_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"].to_str().unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_health_and_readiness() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let json = body_json(mock_app().oneshot(request).await.unwrap()).await;
    assert_eq!(json["status"], "ok");

    let request = Request::builder().uri("/readyz").body(Body::empty()).unwrap();
    let json = body_json(mock_app().oneshot(request).await.unwrap()).await;
    assert_eq!(json["status"], "ready");
    assert_eq!(json["upstream"], "mock");
    assert_eq!(json["model"], "moonshotai/kimi-dev-72b:free");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-123")
        .body(Body::empty())
        .unwrap();
    let response = mock_app().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-123");
}
