use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing_error::SpanTrace;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One conversation turn. History is ordered oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Which page the widget is embedded in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum UserLocation {
    #[default]
    #[serde(rename = "main")]
    Main,
    #[serde(rename = "bridvia-connect")]
    BridviaConnect,
}

impl UserLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserLocation::Main => "main",
            UserLocation::BridviaConnect => "bridvia-connect",
        }
    }

    /// Unknown values fall back to `Main`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.parse() {
            Ok(loc) => loc,
            Err(_) => UserLocation::Main,
        }
    }
}

impl FromStr for UserLocation {
    type Err = AssistantError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "main" => Ok(UserLocation::Main),
            "bridvia-connect" => Ok(UserLocation::BridviaConnect),
            other => Err(AssistantError::InvalidRequest(format!(
                "Invalid user location: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for UserLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fragment handed from the relay to the SSE writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    Delta(String),
    Done,
    Error { error: String, content: String },
}

impl StreamChunk {
    pub fn content(&self) -> &str {
        match self {
            StreamChunk::Delta(s) => s,
            StreamChunk::Done => crate::constants::DONE_TOKEN,
            StreamChunk::Error { content, .. } => content,
        }
    }
}

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream error (status {0}): {1}")]
    Upstream(axum::http::StatusCode, String),

    #[error("Upstream timed out: {0}")]
    Timeout(String),
}

impl axum::response::IntoResponse for ObservedError {
    fn into_response(self) -> axum::response::Response {
        let code = match &self.inner {
            AssistantError::InvalidRequest(m) => {
                return (
                    axum::http::StatusCode::BAD_REQUEST,
                    axum::Json(serde_json::json!({
                        "error": m,
                        "code": "INVALID_REQUEST",
                    })),
                )
                    .into_response();
            }
            AssistantError::Serialization(_) => "SERIALIZATION_ERROR",
            AssistantError::Network(_) => "NETWORK_ERROR",
            AssistantError::Upstream(_, _) => "UPSTREAM_ERROR",
            AssistantError::Timeout(_) => "TIMEOUT",
        };
        tracing::error!("Request failed: {}", self);
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(serde_json::json!({
                "error": "Internal server error",
                "code": code,
                "fallbackResponse": crate::constants::FAILURE_FALLBACK,
            })),
        )
            .into_response()
    }
}

#[derive(Debug)]
pub struct ObservedError {
    pub inner: AssistantError,
    pub span_trace: SpanTrace,
}

impl std::fmt::Display for ObservedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n\nSpan Trace:\n{}", self.inner, self.span_trace)
    }
}

impl std::error::Error for ObservedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.inner)
    }
}

impl<E> From<E> for ObservedError
where
    E: Into<AssistantError>,
{
    fn from(error: E) -> Self {
        Self {
            inner: error.into(),
            span_trace: SpanTrace::capture(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ObservedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_parsing_is_strict_or_lenient() {
        assert_eq!("bridvia-connect".parse::<UserLocation>().ok(), Some(UserLocation::BridviaConnect));
        assert!("elsewhere".parse::<UserLocation>().is_err());
        assert_eq!(UserLocation::parse_lenient("elsewhere"), UserLocation::Main);
        assert_eq!(UserLocation::parse_lenient("bridvia-connect"), UserLocation::BridviaConnect);
    }

    #[test]
    fn error_status_codes() {
        use axum::response::IntoResponse;
        let bad: ObservedError = AssistantError::InvalidRequest("nope".into()).into();
        assert_eq!(bad.into_response().status(), axum::http::StatusCode::BAD_REQUEST);
        let slow: ObservedError = AssistantError::Timeout("30s".into()).into();
        assert_eq!(
            slow.into_response().status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn message_serializes_lowercase_role() {
        let json = serde_json::to_value(Message::assistant("hi")).unwrap_or_default();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
    }
}
