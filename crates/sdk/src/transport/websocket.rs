//! WebSocket transport for streamed searches.

use crate::config::ClientConfig;
use crate::diagnostics::Invocation;
use crate::error::{ProscoutError, ProscoutResult};
use futures_util::{Sink, SinkExt, StreamExt};
use proscout_core::{
    CloseReason, Operation, SearchEventKind, SearchObserver, SearchQuery, SearchResult,
    StreamCollector, StreamRequest, StreamTermination,
};
use std::sync::Arc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;
use url::Url;

/// Path of the streaming endpoint below the base URL.
const STREAM_PATH: [&str; 3] = ["api", "search", "stream"];

/// How a streamed search ended.
enum StreamOutcome {
    Completed,
    Rejected(String),
    DeadlineElapsed,
    ServerClosed,
    Failed(ProscoutError),
}

impl StreamOutcome {
    fn close_reason(&self) -> CloseReason {
        match self {
            Self::Completed => CloseReason::Completed,
            Self::Rejected(_) => CloseReason::Rejected,
            Self::DeadlineElapsed => CloseReason::DeadlineElapsed,
            Self::ServerClosed => CloseReason::ServerClosed,
            Self::Failed(_) => CloseReason::TransportError,
        }
    }
}

/// Runs searches over a dedicated WebSocket per call.
///
/// Every call opens its own channel, sends one `query` message, and collects
/// `result` messages until `complete`, `error`, the deadline, or a server
/// close. The channel is closed once on each of those paths.
#[derive(Clone)]
pub struct StreamingSearch {
    config: Arc<ClientConfig>,
    observer: Arc<dyn SearchObserver>,
}

impl StreamingSearch {
    /// Create a streaming search transport.
    pub fn new(config: Arc<ClientConfig>, observer: Arc<dyn SearchObserver>) -> Self {
        Self { config, observer }
    }

    /// Build the WebSocket URL from the base URL.
    pub fn build_ws_url(&self) -> ProscoutResult<Url> {
        let mut url = self.config.base_url.clone();

        let new_scheme = match url.scheme() {
            "https" | "wss" => "wss",
            _ => "ws",
        };

        url.set_scheme(new_scheme)
            .map_err(|_| ProscoutError::Config("Failed to set WebSocket scheme".to_string()))?;
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| ProscoutError::Config("base_url cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend(STREAM_PATH);

        Ok(url)
    }

    /// Run one streamed search.
    ///
    /// The handshake is bounded by the HTTP timeout; the stream deadline
    /// starts once the channel is open.
    ///
    /// Resolves with the accumulated profiles on `complete`, on deadline, or
    /// when the server closes the channel. Rejects with the server's message
    /// on `error`, and with a transport error when the socket fails.
    pub async fn search(&self, query: &SearchQuery) -> ProscoutResult<SearchResult> {
        let ws_url = self.build_ws_url()?;
        let invocation = Invocation::start(&*self.observer, Operation::StreamSearch, ws_url.as_str());

        debug!(url = %ws_url, "Connecting to WebSocket");
        let connected =
            match tokio::time::timeout(self.config.timeout, connect_async(ws_url.as_str())).await {
                Ok(Ok((ws_stream, _))) => Ok(ws_stream),
                Ok(Err(e)) => Err(ProscoutError::WebSocket(e.to_string())),
                Err(_) => Err(ProscoutError::Timeout),
            };
        let ws_stream = match connected {
            Ok(ws_stream) => ws_stream,
            Err(err) => {
                invocation.failed(&err);
                return Err(err);
            }
        };

        let deadline = tokio::time::sleep(self.config.stream_deadline);
        tokio::pin!(deadline);

        let (mut write, mut read) = ws_stream.split();
        let mut collector = StreamCollector::new(query.max_results());

        let outcome = match self.send_query(&mut write, query).await {
            Err(err) => StreamOutcome::Failed(err),
            Ok(()) => loop {
                tokio::select! {
                    _ = &mut deadline => break StreamOutcome::DeadlineElapsed,
                    frame = read.next() => match frame {
                        Some(Ok(Message::Text(text))) => match collector.apply_text(&text) {
                            Ok(Some(StreamTermination::Completed)) => break StreamOutcome::Completed,
                            Ok(Some(StreamTermination::Rejected(message))) => {
                                break StreamOutcome::Rejected(message)
                            }
                            Ok(None) => {}
                            Err(e) => invocation.emit(SearchEventKind::MalformedMessage {
                                error: e.to_string(),
                                raw: text.to_string(),
                            }),
                        },
                        Some(Ok(Message::Binary(data))) => {
                            invocation.emit(SearchEventKind::MalformedMessage {
                                error: format!("unexpected binary frame of {} bytes", data.len()),
                                raw: String::from_utf8_lossy(&data).into_owned(),
                            })
                        }
                        Some(Ok(Message::Close(_))) | None => break StreamOutcome::ServerClosed,
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            break StreamOutcome::Failed(ProscoutError::WebSocket(e.to_string()))
                        }
                    },
                }
            },
        };

        let reason = outcome.close_reason();
        if let Err(e) = write.close().await {
            debug!(error = %e, "WebSocket close did not complete cleanly");
        }
        invocation.emit(SearchEventKind::ChannelClosed { reason });

        match outcome {
            StreamOutcome::Completed | StreamOutcome::ServerClosed => {
                let result = collector.finish(invocation.elapsed());
                invocation.completed(result.len(), result.total_count);
                Ok(result)
            }
            StreamOutcome::DeadlineElapsed => {
                invocation.emit(SearchEventKind::DeadlineElapsed {
                    profiles: collector.profile_count(),
                    deadline_ms: u64::try_from(self.config.stream_deadline.as_millis())
                        .unwrap_or(u64::MAX),
                });
                let result = collector.finish(invocation.elapsed());
                invocation.completed(result.len(), result.total_count);
                Ok(result)
            }
            StreamOutcome::Rejected(message) => {
                let err = ProscoutError::StreamRejected { message };
                invocation.failed(&err);
                Err(err)
            }
            StreamOutcome::Failed(err) => {
                invocation.failed(&err);
                Err(err)
            }
        }
    }

    /// Send the opening `query` message.
    async fn send_query<S>(&self, write: &mut S, query: &SearchQuery) -> ProscoutResult<()>
    where
        S: Sink<Message> + Unpin,
        S::Error: std::fmt::Display,
    {
        let request = StreamRequest::query(query, self.config.api_key.clone());
        let json = serde_json::to_string(&request)?;

        write
            .send(Message::Text(json))
            .await
            .map_err(|e| ProscoutError::WebSocket(e.to_string()))
    }
}
