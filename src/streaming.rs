//! Streaming Relay
//!
//! Opens a `stream=true` completion, re-emits text deltas as `StreamChunk`s
//! and finishes with an optional corrective chunk plus `Done`. Without a
//! credential, or after any transport failure, the mock reply is played back
//! word by word instead.
//!
//! The relay runs on its own task and writes into a bounded channel. When the
//! receiver is dropped the relay stops at its next await point, which drops
//! the upstream body and its connection.

use crate::completion::BridAssistant;
use crate::constants::*;
use crate::logging::StreamMetric;
use crate::mock::{generate_mock, mock_words};
use crate::sanitize::{is_meaningful_change, sanitize, DeliberationFilter};
use crate::specs::openai::StreamPulse;
use crate::types::*;
use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};
use tracing::Instrument;

const CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Every chunk was delivered; the caller should send `Done`.
    Completed,
    /// The receiver went away.
    ClientGone,
}

/// How an upstream read ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpstreamEnd {
    Finished,
    Interrupted,
    ClientGone,
}

pub struct StreamRelay {
    assistant: Arc<BridAssistant>,
    message: String,
    history: Vec<Message>,
    location: UserLocation,
    word_delay: Duration,
}

impl BridAssistant {
    /// Starts a relay task and returns its chunk stream. The stream always
    /// ends with `Done`, or with a single `Error` chunk if the relay task
    /// itself died.
    pub fn generate_stream(
        self: Arc<Self>,
        message: String,
        history: Vec<Message>,
        location: UserLocation,
    ) -> ReceiverStream<StreamChunk> {
        StreamRelay::new(self, message, history, location).spawn()
    }
}

impl StreamRelay {
    pub fn new(
        assistant: Arc<BridAssistant>,
        message: String,
        history: Vec<Message>,
        location: UserLocation,
    ) -> Self {
        Self {
            assistant,
            message,
            history,
            location,
            word_delay: Duration::from_millis(MOCK_WORD_DELAY_MS),
        }
    }

    pub fn with_word_delay(mut self, delay: Duration) -> Self {
        self.word_delay = delay;
        self
    }

    pub fn spawn(self) -> ReceiverStream<StreamChunk> {
        let stream_span = tracing::info_span!(
            "stream",
            stream_id = %uuid::Uuid::new_v4(),
            location = %self.location
        );
        supervise(stream_span, move |tx| async move { self.run(&tx).await })
    }

    /// Drives the relay to completion, or until the receiver closes.
    pub async fn run(self, tx: &mpsc::Sender<StreamChunk>) -> RelayOutcome {
        let mut metrics = StreamMetric::new();
        let outcome = tokio::select! {
            outcome = self.drive(tx, &mut metrics) => outcome,
            _ = tx.closed() => RelayOutcome::ClientGone,
        };
        metrics.log_summary();
        outcome
    }

    async fn drive(&self, tx: &mpsc::Sender<StreamChunk>, metrics: &mut StreamMetric) -> RelayOutcome {
        if !self.assistant.has_credential() {
            tracing::debug!("[🎭] No upstream credential, streaming mock reply");
            return self.stream_mock(tx, metrics).await;
        }

        let response = match self
            .assistant
            .open_stream(&self.message, &self.history, self.location)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Upstream stream failed to open, using mock: {}", e.inner);
                return self.stream_mock(tx, metrics).await;
            }
        };

        let body = response
            .bytes_stream()
            .map(|r| r.map_err(std::io::Error::other));

        match relay_upstream(body, tx, self.assistant.config().timeout, metrics).await {
            UpstreamEnd::Finished => RelayOutcome::Completed,
            UpstreamEnd::ClientGone => RelayOutcome::ClientGone,
            UpstreamEnd::Interrupted => self.stream_mock(tx, metrics).await,
        }
    }

    async fn stream_mock(&self, tx: &mpsc::Sender<StreamChunk>, metrics: &mut StreamMetric) -> RelayOutcome {
        metrics.switch_to_mock();
        let text = generate_mock(&self.message, self.location);
        play_words(&text, tx, self.word_delay, metrics).await
    }
}

/// Runs `relay` on its own task and turns its outcome into the closing
/// chunk: `Done` when it completed, nothing when the client left, and a
/// single `Error` when the task died.
fn supervise<F, Fut>(span: tracing::Span, relay: F) -> ReceiverStream<StreamChunk>
where
    F: FnOnce(mpsc::Sender<StreamChunk>) -> Fut,
    Fut: Future<Output = RelayOutcome> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let relay = relay(tx.clone());

    tokio::spawn(
        async move {
            match tokio::spawn(relay.in_current_span()).await {
                Ok(RelayOutcome::Completed) => {
                    let _ = tx.send(StreamChunk::Done).await;
                }
                Ok(RelayOutcome::ClientGone) => {
                    tracing::debug!("[⚙️  -> 🌐] Client disconnected, relay stopped");
                }
                Err(e) => {
                    tracing::error!("[⚙️  -> 🌐] Relay task failed: {}", e);
                    let _ = tx
                        .send(StreamChunk::Error {
                            error: "Streaming failed".to_string(),
                            content: FAILURE_FALLBACK.to_string(),
                        })
                        .await;
                }
            }
        }
        .instrument(span),
    );

    ReceiverStream::new(rx)
}

/// Sends `text` as a word-by-word stream with `delay` between words.
pub async fn play_words(
    text: &str,
    tx: &mpsc::Sender<StreamChunk>,
    delay: Duration,
    metrics: &mut StreamMetric,
) -> RelayOutcome {
    let words = mock_words(text);
    let last = words.len().saturating_sub(1);
    for (i, word) in words.into_iter().enumerate() {
        metrics.record_delta(&word, true);
        if tx.send(StreamChunk::Delta(word)).await.is_err() {
            return RelayOutcome::ClientGone;
        }
        if i < last && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    RelayOutcome::Completed
}

/// Reads upstream SSE lines from `body` and forwards admitted deltas.
/// `idle` bounds the wait for each line.
async fn relay_upstream<R>(
    body: R,
    tx: &mpsc::Sender<StreamChunk>,
    idle: Duration,
    metrics: &mut StreamMetric,
) -> UpstreamEnd
where
    R: Stream<Item = std::result::Result<Bytes, std::io::Error>> + Unpin + Send,
{
    let mut lines = FramedRead::new(
        tokio_util::io::StreamReader::new(body),
        LinesCodec::new_with_max_length(MAX_STREAM_LINE_BYTES),
    );
    let mut full_text = String::new();
    let mut filter = DeliberationFilter::new();
    let mut line_count = 0;

    loop {
        let next = match tokio::time::timeout(idle, lines.next()).await {
            Ok(next) => next,
            Err(_) => {
                tracing::warn!("[☁️  -> ⚙️ ] No upstream data for {}s", idle.as_secs());
                return UpstreamEnd::Interrupted;
            }
        };

        let line = match next {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                log_line_error(e);
                return UpstreamEnd::Interrupted;
            }
            None => {
                tracing::debug!("[☁️  -> ⚙️ ] Upstream closed without [DONE]");
                break;
            }
        };

        line_count += 1;
        if line_count > MAX_STREAM_LINES {
            tracing::error!(
                "[☁️  -> ⚙️ ] Stream exceeded max line limit ({})",
                MAX_STREAM_LINES
            );
            break;
        }

        let data = match line.strip_prefix("data:") {
            Some(d) => d.trim(),
            None => continue,
        };
        if data == DONE_TOKEN {
            tracing::debug!("[☁️  -> ⚙️ ] Stream end marker [DONE] received");
            break;
        }

        let pulse: StreamPulse = match serde_json::from_str(data) {
            Ok(p) => p,
            Err(e) => {
                metrics.malformed += 1;
                tracing::debug!("[☁️  -> ⚙️ ] Skipping malformed frame: {}", e);
                continue;
            }
        };
        let text = match pulse.delta_text() {
            Some(t) => t,
            None => continue,
        };

        full_text.push_str(text);
        let admitted = filter.admit(&full_text, text);
        metrics.record_delta(text, admitted);
        if admitted && tx.send(StreamChunk::Delta(text.to_string())).await.is_err() {
            return UpstreamEnd::ClientGone;
        }
    }

    if full_text.trim().is_empty() {
        tracing::warn!("[☁️  -> ⚙️ ] Upstream stream carried no text");
        return UpstreamEnd::Interrupted;
    }

    let cleaned = sanitize(&full_text);
    if is_meaningful_change(&full_text, &cleaned) {
        metrics.corrected = true;
        tracing::debug!("[⚙️  -> 🌐] Sending corrected text ({} chars)", cleaned.len());
        if tx
            .send(StreamChunk::Delta(format!("\n\n{}", cleaned)))
            .await
            .is_err()
        {
            return UpstreamEnd::ClientGone;
        }
    }

    UpstreamEnd::Finished
}

fn log_line_error(e: LinesCodecError) {
    match e {
        LinesCodecError::Io(io) => tracing::warn!("[☁️  -> ⚙️ ] Upstream read failed: {}", io),
        LinesCodecError::MaxLineLengthExceeded => {
            tracing::warn!("[☁️  -> ⚙️ ] Upstream line exceeded {} bytes", MAX_STREAM_LINE_BYTES)
        }
    }
}
