//! Response sanitizer.
//!
//! Some upstream models leak their reasoning, either wrapped in marker pairs
//! (`◁think▷ ... ◁/think▷`, `<think> ... </think>`, ...) or as a preamble of
//! meta-commentary before the real answer. Cleaning is two-staged:
//!
//! 1. strip marker spans, trim a deliberation preamble up to the first
//!    answer cue, collapse whitespace;
//! 2. if the result is too short or still reads like deliberation, keep only
//!    answer-like sentences, or fall back to a fixed introduction.
//!
//! The output is never empty and never contains a complete marker span.

use crate::constants::{SANITIZER_FALLBACK, STREAM_OPENER_WINDOW_CHARS};
use crate::str_utils::{char_len, collapse_whitespace, prefix_chars};
use lazy_static::lazy_static;
use regex::Regex;

/// Cleaned text shorter than this goes through sentence filtering.
const MIN_CLEAN_CHARS: usize = 10;

/// Window scanned for leftover deliberation vocabulary.
const RESIDUAL_SCAN_CHARS: usize = 150;

const MIN_SENTENCE_CHARS: usize = 15;

lazy_static! {
    static ref MARKER_SPAN: Regex = Regex::new(
        r"(?s)(?:◁think▷|think▷|hink▷).*?◁/think▷|<think>.*?</think>|\[thinking\].*?\[/thinking\]|\[THOUGHT\].*?\[/THOUGHT\]"
    )
    .expect("Invalid marker span regex");

    static ref DELIBERATION_OPENER: Regex = Regex::new(
        r"(?i)^\s*(?:hink▷|think▷|okay,?\s*let's|let me think|looking at|first,?\s*i\b|the user|i need to|should be|but wait|wait\b,?|actually,?\s*let me|let me|i should|hmm\b,?|well\b,?)"
    )
    .expect("Invalid deliberation opener regex");

    static ref META_COMMENTARY: Regex = Regex::new(
        r"(?i)\b(?:to tackle this|let me analyze|thinking about|considering|examining)\b"
    )
    .expect("Invalid meta commentary regex");

    static ref ANSWER_CUE: Regex = Regex::new(
        r"(?i)\b(?:hello|hi|hey|welcome|good|i'm|bridviaconnect|bridvia|brid|thanks|great|what|sure|absolutely|of course|that's|this|the|our|for|we're|i understand|i appreciate|i'd|it's|you|your)\b"
    )
    .expect("Invalid answer cue regex");

    static ref RESIDUAL_DELIBERATION: Regex = Regex::new(
        r"(?i)(?:hink▷|◁|▷|</?think>|\[/?thinking\]|\[/?thought\]|okay\s*,?\s*let's|let's see|looking at|\bwait\s*,|\bfirst\s*,|the user|\bi need\b|should be|\bchecking\b|\banalyzing\b|let me think|\bhmm\b|\bwell,?\s*let\b|\bactually,?\s*let\b)"
    )
    .expect("Invalid residual deliberation regex");

    static ref SENTENCE_BREAK: Regex = Regex::new(r"[.!?\n]+").expect("Invalid sentence regex");

    static ref STREAM_RESUME_CUE: Regex =
        Regex::new(r"(?i)\b(?:hello|hi|hey|bridvia|i'm)\b").expect("Invalid resume cue regex");
}

const SENTENCE_BLACKLIST: &[&str] = &[
    "hink▷",
    "◁",
    "▷",
    "<think>",
    "</think>",
    "[thinking]",
    "[thought]",
    "okay, let's",
    "let's see",
    "looking at",
    "wait,",
    "first,",
    "the user",
    "i need",
    "should be",
    "checking",
    "analyzing",
    "let me think",
    "hmm,",
    "well, let",
    "actually, let",
];

const SENTENCE_ALLOWLIST: &[&str] = &[
    "hello", "hi", "bridvia", "i'm", "welcome", "great", "thanks", "our", "we", "brid ai",
    "assistant", "you", "your",
];

/// Chunk vocabulary that marks a deliberation opener while the answer is short.
const STREAM_OPENER_TOKENS: &[&str] = &["okay", "let me", "first"];

pub fn sanitize(raw: &str) -> String {
    let unmarked = strip_marker_spans(raw);
    let trimmed = strip_deliberation(&unmarked);
    let collapsed = collapse_whitespace(trimmed);

    if !needs_sentence_filter(&collapsed) {
        return collapsed;
    }

    tracing::debug!(
        "Sanitizer: falling back to sentence filtering ({} chars after trim)",
        char_len(&collapsed)
    );

    match filter_sentences(&unmarked) {
        Some(filtered) => filtered,
        None => {
            tracing::warn!("Sanitizer: no sentence survived filtering, using fallback");
            SANITIZER_FALLBACK.to_string()
        }
    }
}

/// True when sanitizing changed more than whitespace.
pub fn is_meaningful_change(raw: &str, cleaned: &str) -> bool {
    collapse_whitespace(raw) != cleaned
}

/// Removes marker-delimited spans until none remain, so spans that only
/// form after an inner removal are caught too.
pub fn strip_marker_spans(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let next = MARKER_SPAN.replace_all(&text, "").into_owned();
        if next == text {
            return text;
        }
        text = next;
    }
}

fn cut_at_answer(text: &str, from: usize) -> Option<&str> {
    ANSWER_CUE.find_at(text, from).map(|cue| &text[cue.start()..])
}

fn strip_deliberation(text: &str) -> &str {
    let mut current = text;

    if let Some(opener) = DELIBERATION_OPENER.find(current) {
        if let Some(rest) = cut_at_answer(current, opener.end()) {
            current = rest;
        }
    }

    // Meta-commentary only counts when it precedes every answer cue.
    if let Some(meta) = META_COMMENTARY.find(current) {
        let leads = match ANSWER_CUE.find(current) {
            Some(cue) => meta.start() <= cue.start(),
            None => true,
        };
        if leads {
            if let Some(rest) = cut_at_answer(current, meta.end()) {
                current = rest;
            }
        }
    }

    current
}

fn needs_sentence_filter(cleaned: &str) -> bool {
    char_len(cleaned) < MIN_CLEAN_CHARS
        || RESIDUAL_DELIBERATION.is_match(prefix_chars(cleaned, RESIDUAL_SCAN_CHARS))
}

fn is_answer_sentence(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    char_len(&lower) > MIN_SENTENCE_CHARS
        && !SENTENCE_BLACKLIST.iter().any(|p| lower.contains(p))
        && SENTENCE_ALLOWLIST.iter().any(|p| lower.contains(p))
}

fn filter_sentences(text: &str) -> Option<String> {
    let kept: Vec<String> = SENTENCE_BREAK
        .split(text)
        .map(collapse_whitespace)
        .filter(|s| is_answer_sentence(s))
        .collect();

    if kept.is_empty() {
        return None;
    }

    let mut joined = kept.join(". ");
    if !joined.ends_with(['.', '!', '?']) {
        joined.push('.');
    }
    Some(joined)
}

/// Inline filter for the streaming relay. Holds back chunks that look like
/// a deliberation opener until answer vocabulary shows up again. Nothing is
/// released while a `think▷` span is still open.
#[derive(Debug, Default)]
pub struct DeliberationFilter {
    suppressing: bool,
    in_span: bool,
    resume_scan_from: usize,
    pub suppressed_chunks: usize,
}

impl DeliberationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `accumulated` must already include `chunk`. Returns whether the chunk
    /// should be forwarded to the client.
    pub fn admit(&mut self, accumulated: &str, chunk: &str) -> bool {
        let lower = chunk.to_lowercase();
        let has_marker = lower.contains("think▷") || lower.contains("hink▷") || lower.contains('◁');
        let is_opener = char_len(accumulated) < STREAM_OPENER_WINDOW_CHARS
            && STREAM_OPENER_TOKENS.iter().any(|t| lower.contains(t));

        let was_in_span = self.in_span;
        if has_marker || was_in_span {
            self.in_span = has_open_marker_span(accumulated);
        }

        if has_marker || is_opener || was_in_span {
            self.suppressing = true;
            self.resume_scan_from = accumulated.len();
            self.suppressed_chunks += 1;
            return false;
        }

        if self.suppressing {
            let since = accumulated.get(self.resume_scan_from..).unwrap_or(chunk);
            if STREAM_RESUME_CUE.is_match(since) {
                self.suppressing = false;
            } else {
                self.suppressed_chunks += 1;
                return false;
            }
        }

        true
    }

    pub fn is_suppressing(&self) -> bool {
        self.suppressing
    }
}

/// True when the last `think▷` opener has no `◁/think▷` after it.
fn has_open_marker_span(text: &str) -> bool {
    let last_open = text
        .match_indices("hink▷")
        .map(|(i, _)| i)
        .filter(|&i| !text[..i].ends_with("/t"))
        .last();
    match (last_open, text.rfind("/think▷")) {
        (Some(open), Some(close)) => open > close,
        (Some(_), None) => true,
        _ => false,
    }
}
