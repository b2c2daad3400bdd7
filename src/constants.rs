/// OpenRouter API endpoints
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Default model served to the assistant widget
pub const DEFAULT_MODEL: &str = "moonshotai/kimi-dev-72b:free";

/// Attribution headers sent to OpenRouter
pub const DEFAULT_REFERER: &str = "https://bridvia.com";
pub const DEFAULT_APP_TITLE: &str = "Bridvia Platform";

/// Sampling parameters shared by the blocking and streaming paths
pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 0.9;

/// Upstream is told to stop as soon as it opens a reasoning block.
pub const REASONING_STOP_TOKENS: &[&str] = &["◁think▷", "think▷", "<think>", "[thinking]", "[THOUGHT]"];

/// Number of prior turns forwarded upstream
pub const HISTORY_WINDOW: usize = 10;

/// Simulated token cadence for the mock stream
pub const MOCK_WORD_DELAY_MS: u64 = 50;

/// Inline stream filter: opener vocabulary only counts while the answer is this short.
pub const STREAM_OPENER_WINDOW_CHARS: usize = 50;

pub const MAX_STREAM_LINES: usize = 100_000;
pub const MAX_STREAM_LINE_BYTES: usize = 1024 * 1024;

/// Literal fallbacks
pub const EMPTY_COMPLETION_FALLBACK: &str = "I apologize, but I encountered an issue processing your request. Please try again or contact us at info@bridvia.com.";

pub const FAILURE_FALLBACK: &str = "I apologize, but I encountered an issue processing your request. Please try again or contact us at info@bridvia.com for assistance.";

pub const SANITIZER_FALLBACK: &str = "Hello! I'm Brid AI, and I'm here to help you explore Bridvia's internship opportunities and career development platform. How can I assist you today?";

/// SSE control token
pub const DONE_TOKEN: &str = "[DONE]";
