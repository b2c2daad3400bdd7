#![allow(dead_code)]

use axum::Router;
use bridvia_assistant::completion::{BridAssistant, UpstreamConfig};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_KEY: &str = "sk-or-test";

/// Serves `router` on an ephemeral local port and returns its `/api/v1` base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api/v1", addr)
}

pub fn assistant_for(base_url: &str, timeout: Duration) -> Arc<BridAssistant> {
    Arc::new(BridAssistant::new(
        reqwest::Client::new(),
        UpstreamConfig {
            api_key: Some(TEST_KEY.to_string()),
            base_url: base_url.to_string(),
            timeout,
            ..UpstreamConfig::default()
        },
    ))
}

pub fn mock_assistant() -> Arc<BridAssistant> {
    Arc::new(BridAssistant::new(
        reqwest::Client::new(),
        UpstreamConfig::default(),
    ))
}

pub fn delta_frame(text: &str) -> String {
    format!(
        "data: {}\n\n",
        serde_json::json!({"choices": [{"index": 0, "delta": {"content": text}}]})
    )
}
