use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Correlates every event emitted by one client invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client operation an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Search,
    StreamSearch,
    GetProfile,
    ProfileMatches,
    MutualConnections,
    RequestIntroduction,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::StreamSearch => "stream_search",
            Self::GetProfile => "get_profile",
            Self::ProfileMatches => "profile_matches",
            Self::MutualConnections => "mutual_connections",
            Self::RequestIntroduction => "request_introduction",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Credentials rejected by the remote service
    Authentication,
    /// Connection refused, DNS failure, timeout, retryable server status
    Transport,
    /// Payload or message that could not be decoded
    Protocol,
    /// Error reported by the service itself
    Remote,
    /// Invalid client-side configuration or input
    Configuration,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Transport => "transport",
            Self::Protocol => "protocol",
            Self::Remote => "remote",
            Self::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a streamed channel was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    Completed,
    Rejected,
    DeadlineElapsed,
    ServerClosed,
    TransportError,
}

/// A diagnostic event emitted by the search client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchEvent {
    pub request_id: RequestId,
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub kind: SearchEventKind,
}

impl SearchEvent {
    pub fn new(request_id: RequestId, operation: Operation, kind: SearchEventKind) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
            operation,
            kind,
        }
    }
}

impl std::fmt::Display for SearchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.request_id, self.operation, self.kind)
    }
}

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchEventKind {
    RequestIssued {
        target: String,
    },
    RequestFailed {
        failure: FailureKind,
        status: Option<u16>,
        message: String,
    },
    Completed {
        profiles: usize,
        total_count: u64,
        elapsed_ms: u64,
    },
    /// Inbound stream message that could not be decoded; it was dropped
    MalformedMessage {
        error: String,
        raw: String,
    },
    DeadlineElapsed {
        profiles: usize,
        deadline_ms: u64,
    },
    ChannelClosed {
        reason: CloseReason,
    },
}

impl SearchEventKind {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::RequestFailed { .. })
    }
}

impl std::fmt::Display for SearchEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestIssued { target } => write!(f, "request issued to {}", target),
            Self::RequestFailed {
                failure: FailureKind::Authentication,
                status,
                message,
            } => match status {
                Some(status) => write!(
                    f,
                    "authentication rejected by search service (status {}): {}",
                    status, message
                ),
                None => write!(f, "authentication rejected by search service: {}", message),
            },
            Self::RequestFailed {
                failure,
                status,
                message,
            } => match status {
                Some(status) => write!(f, "{} failure (status {}): {}", failure, status, message),
                None => write!(f, "{} failure: {}", failure, message),
            },
            Self::Completed {
                profiles,
                total_count,
                elapsed_ms,
            } => write!(
                f,
                "completed with {} profiles of {} in {}ms",
                profiles, total_count, elapsed_ms
            ),
            Self::MalformedMessage { error, .. } => {
                write!(f, "dropped malformed stream message: {}", error)
            }
            Self::DeadlineElapsed {
                profiles,
                deadline_ms,
            } => write!(
                f,
                "no terminal message within {}ms, resolving with {} profiles",
                deadline_ms, profiles
            ),
            Self::ChannelClosed { reason } => write!(f, "channel closed ({:?})", reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failure_mentions_authentication() {
        let kind = SearchEventKind::RequestFailed {
            failure: FailureKind::Authentication,
            status: Some(401),
            message: "invalid api key".to_string(),
        };

        let text = kind.to_string();
        assert!(text.contains("authentication"));
        assert!(text.contains("401"));
    }

    #[test]
    fn test_transport_failure_text() {
        let kind = SearchEventKind::RequestFailed {
            failure: FailureKind::Transport,
            status: None,
            message: "connection refused".to_string(),
        };

        assert_eq!(kind.to_string(), "transport failure: connection refused");
        assert!(kind.is_failure());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let event = SearchEvent::new(
            RequestId::new(),
            Operation::StreamSearch,
            SearchEventKind::ChannelClosed {
                reason: CloseReason::DeadlineElapsed,
            },
        );

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["operation"], "stream_search");
        assert_eq!(value["kind"]["type"], "channel_closed");
        assert_eq!(value["kind"]["reason"], "deadline_elapsed");
    }
}
