// Streamed-search wire messages and the per-invocation accumulator

use crate::query::{QueryPayload, SearchQuery};
use crate::result::{deserialize_millis, SearchResult};
use crate::types::ProfileRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outbound message opening a streamed search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamRequest {
    Query {
        data: QueryPayload,
        #[serde(rename = "apiKey", default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
    },
}

impl StreamRequest {
    pub fn query(query: &SearchQuery, api_key: Option<String>) -> Self {
        Self::Query {
            data: query.to_payload(),
            api_key,
        }
    }
}

/// Inbound messages on the streamed channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    /// A batch of profiles
    #[serde(rename = "result")]
    Chunk {
        #[serde(default)]
        data: ResultChunk,
    },
    Complete {
        #[serde(default)]
        data: CompletionSummary,
    },
    Error {
        #[serde(default)]
        data: StreamFailure,
    },
    /// Any other message type (heartbeats, progress); ignored
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultChunk {
    #[serde(default, alias = "results")]
    pub profiles: Vec<ProfileRecord>,
    /// Single-profile form of a chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "totalCount")]
    pub total_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionSummary {
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "totalCount")]
    pub total_count: Option<u64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "executionTime",
        deserialize_with = "deserialize_millis"
    )]
    pub execution_time: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamFailure {
    #[serde(default, alias = "error")]
    pub message: String,
}

/// Terminal message seen by a [`StreamCollector`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamTermination {
    Completed,
    /// Server-supplied error text, verbatim
    Rejected(String),
}

/// Accumulates the messages of one streamed search.
///
/// Profiles beyond `max_results` are counted but not kept. The final total is
/// the last total the server reported, or the number of profiles received
/// when it never reported one.
#[derive(Debug)]
pub struct StreamCollector {
    max_results: usize,
    profiles: Vec<ProfileRecord>,
    received: u64,
    reported_total: Option<u64>,
    execution_time_ms: Option<u64>,
}

impl StreamCollector {
    pub fn new(max_results: usize) -> Self {
        Self {
            max_results,
            profiles: Vec::new(),
            received: 0,
            reported_total: None,
            execution_time_ms: None,
        }
    }

    /// Decode one text frame and apply it
    pub fn apply_text(&mut self, text: &str) -> Result<Option<StreamTermination>, serde_json::Error> {
        let message: StreamMessage = serde_json::from_str(text)?;
        Ok(self.apply(message))
    }

    /// Apply one message; returns the termination once a terminal message arrives
    pub fn apply(&mut self, message: StreamMessage) -> Option<StreamTermination> {
        match message {
            StreamMessage::Chunk { data } => {
                let ResultChunk {
                    profiles,
                    profile,
                    total_count,
                } = data;

                for profile in profiles.into_iter().chain(profile) {
                    self.received += 1;
                    if self.profiles.len() < self.max_results {
                        self.profiles.push(profile);
                    }
                }
                if total_count.is_some() {
                    self.reported_total = total_count;
                }
                None
            }
            StreamMessage::Complete { data } => {
                if data.total_count.is_some() {
                    self.reported_total = data.total_count;
                }
                self.execution_time_ms = data.execution_time;
                Some(StreamTermination::Completed)
            }
            StreamMessage::Error { data } => Some(StreamTermination::Rejected(data.message)),
            StreamMessage::Unknown => None,
        }
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.len()
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    /// Normalized result of everything accumulated so far
    pub fn finish(self, elapsed: Duration) -> SearchResult {
        let total = self.reported_total.unwrap_or(self.received);
        SearchResult::normalize(
            self.profiles,
            Some(total),
            self.execution_time_ms,
            self.max_results,
            elapsed,
        )
    }
}
