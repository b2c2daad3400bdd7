//! Conversation History Window
//!
//! The browser owns the conversation. Before it goes upstream we keep only the
//! most recent turns so the payload stays bounded; older turns are dropped
//! silently and order is preserved.

use crate::constants::HISTORY_WINDOW;
use crate::types::Message;

/// Returns the last `HISTORY_WINDOW` messages, oldest first.
pub fn window_history(history: &[Message]) -> &[Message] {
    window_history_to(history, HISTORY_WINDOW)
}

pub fn window_history_to(history: &[Message], keep: usize) -> &[Message] {
    let start = history.len().saturating_sub(keep);
    if start > 0 {
        tracing::debug!(
            "History window: dropping {} of {} turns",
            start,
            history.len()
        );
    }
    &history[start..]
}
