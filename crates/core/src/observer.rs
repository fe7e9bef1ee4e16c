// Observability port for the search client

use crate::events::{FailureKind, SearchEvent, SearchEventKind};
use std::sync::{Arc, Mutex, PoisonError};

/// Receives every diagnostic event the client emits
pub trait SearchObserver: Send + Sync {
    fn on_event(&self, event: &SearchEvent);
}

/// Default observer: writes events through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SearchObserver for TracingObserver {
    fn on_event(&self, event: &SearchEvent) {
        let operation = event.operation.as_str();

        match &event.kind {
            SearchEventKind::RequestIssued { .. } => {
                tracing::debug!(request_id = %event.request_id, operation, "{}", event.kind);
            }
            SearchEventKind::RequestFailed {
                failure: FailureKind::Authentication,
                status,
                ..
            } => {
                tracing::warn!(
                    request_id = %event.request_id,
                    operation,
                    status = ?status,
                    "{}",
                    event.kind
                );
            }
            SearchEventKind::RequestFailed { failure, status, .. } => {
                tracing::error!(
                    request_id = %event.request_id,
                    operation,
                    failure = failure.as_str(),
                    status = ?status,
                    "{}",
                    event.kind
                );
            }
            SearchEventKind::MalformedMessage { .. } | SearchEventKind::DeadlineElapsed { .. } => {
                tracing::warn!(request_id = %event.request_id, operation, "{}", event.kind);
            }
            SearchEventKind::Completed { .. } => {
                tracing::info!(request_id = %event.request_id, operation, "{}", event.kind);
            }
            SearchEventKind::ChannelClosed { .. } => {
                tracing::debug!(request_id = %event.request_id, operation, "{}", event.kind);
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<SearchEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far
    pub fn events(&self) -> Vec<SearchEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count_where(&self, predicate: impl Fn(&SearchEventKind) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| predicate(&e.kind))
            .count()
    }

    pub fn failures(&self) -> Vec<SearchEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.kind.is_failure())
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl SearchObserver for RecordingObserver {
    fn on_event(&self, event: &SearchEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Forwards each event to several observers in order
#[derive(Clone, Default)]
pub struct FanoutObserver {
    observers: Vec<Arc<dyn SearchObserver>>,
}

impl FanoutObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn SearchObserver>) -> Self {
        self.observers.push(observer);
        self
    }
}

impl SearchObserver for FanoutObserver {
    fn on_event(&self, event: &SearchEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}
