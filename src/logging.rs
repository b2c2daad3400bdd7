use crate::ingress::ChatRequest;
use axum::{
    body::Body,
    http::{HeaderValue, Request, Response},
    middleware::Next,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::Write;
use std::panic;
use tracing::{error, info};
use tracing::{info_span, Instrument};
use tracing_subscriber::fmt::MakeWriter;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

lazy_static! {
    static ref SECRET_REGEX: Regex = Regex::new(
        r"(?i)(sk-or-v1-[A-Za-z0-9]+|sk-[A-Za-z0-9_-]{20,}|Bearer\s+[^\s]+)"
    ).expect("Invalid redaction regex");
}

/// Sets up a global panic hook that logs panics through tracing before the
/// default hook runs.
pub fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let backtrace = std::backtrace::Backtrace::capture();

        let payload = panic_info.payload();
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            *s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.as_str()
        } else {
            "Unknown panic payload"
        };

        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        error!(
            target: "panic",
            message = %message,
            location = %location,
            backtrace = %backtrace,
            "FATAL: Application panicked"
        );

        original_hook(panic_info);
    }));
}

/// Tags every request with an id (the caller's `x-request-id` when it sends a
/// usable one) and echoes it on the response.
pub async fn request_id_middleware(mut req: Request<Body>, next: Next) -> Response<Body> {
    let request_id = match req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= 128)
    {
        Some(id) => id.to_string(),
        None => Uuid::new_v4().to_string(),
    };
    let header = HeaderValue::from_str(&request_id).ok();
    if let Some(val) = header.clone() {
        req.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path()
    );
    let mut response = next.run(req).instrument(span).await;
    if let Some(val) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    response
}

pub fn redact_secrets(input: &str) -> std::borrow::Cow<'_, str> {
    SECRET_REGEX.replace_all(input, "[REDACTED]")
}

/// Scrubs API keys and bearer tokens from formatted log lines.
pub struct RedactingWriter<W: Write> {
    inner: W,
}

impl<W: Write> RedactingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let input = String::from_utf8_lossy(buf);
        let redacted = redact_secrets(&input);
        self.inner.write_all(redacted.as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// `MakeWriter` adapter so a redacting writer can back a fmt layer.
pub struct Redacting<M> {
    inner: M,
}

impl<M> Redacting<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

impl<'a, M> MakeWriter<'a> for Redacting<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter::new(self.inner.make_writer())
    }
}

pub fn log_request_summary(request: &ChatRequest, streaming: bool) {
    info!(
        target: "flight_recorder",
        "[REQ] Stream: {} | Location: {} | History: {} | Message: {} chars | Session: {}",
        streaming,
        request.location,
        request.history.len(),
        crate::str_utils::char_len(&request.message),
        crate::str_utils::prefix_chars(request.session_id.as_deref().unwrap_or("unknown"), 12)
    );
}

/// Where a stream's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamSource {
    #[default]
    Upstream,
    Mock,
    UpstreamThenMock,
}

#[derive(Default, Debug)]
pub struct StreamMetric {
    pub frames: usize,
    pub malformed: usize,
    pub forwarded: usize,
    pub suppressed: usize,
    pub text_chars: usize,
    pub corrected: bool,
    pub source: StreamSource,
}

impl StreamMetric {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_delta(&mut self, text: &str, forwarded: bool) {
        self.frames += 1;
        self.text_chars += text.len();
        if forwarded {
            self.forwarded += 1;
        } else {
            self.suppressed += 1;
        }
    }

    pub fn switch_to_mock(&mut self) {
        self.source = match self.source {
            StreamSource::Upstream if self.frames > 0 => StreamSource::UpstreamThenMock,
            StreamSource::UpstreamThenMock => StreamSource::UpstreamThenMock,
            _ => StreamSource::Mock,
        };
    }

    /// Logged inside the stream span, so the request id comes from the span context.
    pub fn log_summary(&self) {
        info!(
            target: "flight_recorder",
            "[STREAM END] Source: {:?} | Frames: {} | Forwarded: {} | Suppressed: {} | Malformed: {} | Text: {} chars | Corrected: {}",
            self.source,
            self.frames,
            self.forwarded,
            self.suppressed,
            self.malformed,
            self.text_chars,
            self.corrected
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_keys_and_bearer_tokens() {
        let line = "auth Bearer sk-or-v1-abcdef123456 key=sk-abcdefghijklmnopqrstuvwxyz";
        let out = redact_secrets(line);
        assert!(!out.contains("abcdef123456"));
        assert!(!out.contains("abcdefghijklmnopqrstuvwxyz"));
        assert!(out.contains("[REDACTED]"));
    }

    #[test]
    fn redacting_writer_passes_plain_text() {
        let mut buf = Vec::new();
        {
            let mut w = RedactingWriter::new(&mut buf);
            let n = w.write(b"hello Bearer secret-token\n").unwrap();
            assert_eq!(n, 26);
        }
        assert_eq!(String::from_utf8(buf).unwrap(), "hello [REDACTED]\n");
    }

    #[test]
    fn metric_tracks_source_transitions() {
        let mut m = StreamMetric::new();
        m.switch_to_mock();
        assert_eq!(m.source, StreamSource::Mock);

        let mut m = StreamMetric::new();
        m.record_delta("Hel", true);
        m.record_delta("okay", false);
        m.switch_to_mock();
        assert_eq!(m.source, StreamSource::UpstreamThenMock);
        assert_eq!((m.forwarded, m.suppressed, m.frames), (1, 1, 2));
    }
}
