//! Request boundary for the chat endpoints.
//!
//! The widget posts loosely shaped JSON, so the body is first read into
//! `RawChatRequest` (every field optional) and then validated into a
//! `ChatRequest`. The non-streaming endpoint rejects unknown locations; the
//! streaming endpoint maps them to `main`.

use crate::types::*;
use serde::Deserialize;
use serde_json::Value;

pub const MESSAGE_REQUIRED: &str = "Message is required and must be a string";
pub const INVALID_LOCATION: &str = "Invalid user location";

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawChatRequest {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub conversation_history: Option<Value>,
    #[serde(default)]
    pub user_location: Option<Value>,
    #[serde(default)]
    pub session_id: Option<Value>,
}

#[derive(Deserialize, Debug)]
struct RawHistoryEntry {
    role: Option<Role>,
    content: Option<String>,
}

/// A validated chat request.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<Message>,
    pub location: UserLocation,
    pub session_id: Option<String>,
}

impl RawChatRequest {
    pub fn from_value(payload: Value) -> Result<Self> {
        if !payload.is_object() {
            return Err(AssistantError::InvalidRequest(MESSAGE_REQUIRED.to_string()).into());
        }
        Ok(serde_json::from_value(payload)?)
    }

    /// Non-streaming rules: the location must be one of the known values.
    /// The message is checked first.
    pub fn validate_strict(self) -> Result<ChatRequest> {
        let message = self.require_message()?;
        let location = match &self.user_location {
            None | Some(Value::Null) => UserLocation::default(),
            Some(Value::String(s)) => match s.parse::<UserLocation>() {
                Ok(loc) => loc,
                Err(_) => {
                    return Err(AssistantError::InvalidRequest(INVALID_LOCATION.to_string()).into())
                }
            },
            Some(_) => {
                return Err(AssistantError::InvalidRequest(INVALID_LOCATION.to_string()).into())
            }
        };
        Ok(self.into_request(message, location))
    }

    /// Streaming rules: any unrecognised location is treated as `main`.
    pub fn validate_lenient(self) -> Result<ChatRequest> {
        let message = self.require_message()?;
        let location = match &self.user_location {
            Some(Value::String(s)) => UserLocation::parse_lenient(s),
            _ => UserLocation::default(),
        };
        Ok(self.into_request(message, location))
    }

    fn require_message(&self) -> Result<String> {
        match &self.message {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
            _ => Err(AssistantError::InvalidRequest(MESSAGE_REQUIRED.to_string()).into()),
        }
    }

    fn into_request(self, message: String, location: UserLocation) -> ChatRequest {
        ChatRequest {
            message,
            history: parse_history(self.conversation_history),
            location,
            session_id: match self.session_id {
                Some(Value::String(s)) if !s.is_empty() => Some(s),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            },
        }
    }
}

/// Keeps well-formed `{role, content}` entries in order and drops the rest.
fn parse_history(raw: Option<Value>) -> Vec<Message> {
    let entries = match raw {
        Some(Value::Array(entries)) => entries,
        _ => return Vec::new(),
    };
    let total = entries.len();

    let history: Vec<Message> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RawHistoryEntry>(entry).ok())
        .filter_map(|entry| match (entry.role, entry.content) {
            (Some(role), Some(content)) => Some(Message { role, content }),
            _ => None,
        })
        .collect();

    if history.len() < total {
        tracing::debug!(
            "Dropped {} malformed history entries",
            total - history.len()
        );
    }
    history
}
