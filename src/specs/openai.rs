use crate::types::Message;
use serde::{Deserialize, Serialize};

/// --- OPENROUTER CHAT COMPLETIONS SCHEMA (the subset we send and read) ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenAiRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,

    #[serde(default)]
    pub stream: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

/// Non-streaming response body. Only `choices[0].message.content` is used.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

/// One `data:` frame of a streamed completion.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StreamPulse {
    #[serde(default)]
    pub choices: Vec<PulseChoice>,
}

impl StreamPulse {
    /// Non-empty text delta of the first choice, if any.
    pub fn delta_text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PulseChoice {
    #[serde(default)]
    pub delta: PulseDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PulseDelta {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_always_carries_stream_flag() {
        let req = OpenAiRequest {
            model: "m".into(),
            messages: vec![Message::user("hi")],
            max_tokens: 500,
            temperature: 0.7,
            top_p: 0.9,
            stream: false,
            stop: vec!["<think>".into()],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["stop"][0], "<think>");
        assert_eq!(json["max_tokens"], 500);
    }

    #[test]
    fn completion_tolerates_missing_fields() {
        let body: ChatCompletion = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(body.first_content().is_none());

        let body: ChatCompletion =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":"Hi"}}]}"#).unwrap();
        assert_eq!(body.first_content(), Some("Hi"));
    }

    #[test]
    fn pulse_skips_empty_and_role_only_deltas() {
        let p: StreamPulse = serde_json::from_str(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap();
        assert!(p.delta_text().is_none());
        let p: StreamPulse = serde_json::from_str(r#"{"choices":[{"delta":{"content":""}}]}"#).unwrap();
        assert!(p.delta_text().is_none());
        let p: StreamPulse = serde_json::from_str(r#"{"choices":[{"delta":{"content":"Hel"}}]}"#).unwrap();
        assert_eq!(p.delta_text(), Some("Hel"));
    }
}
