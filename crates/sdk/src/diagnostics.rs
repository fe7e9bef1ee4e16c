//! Per-invocation event emission.

use crate::error::ProscoutError;
use proscout_core::{Operation, RequestId, SearchEvent, SearchEventKind, SearchObserver};
use std::time::{Duration, Instant};

/// Emits the events of one client call under a single request id.
pub(crate) struct Invocation<'a> {
    observer: &'a dyn SearchObserver,
    request_id: RequestId,
    operation: Operation,
    started: Instant,
}

impl<'a> Invocation<'a> {
    /// Start a call and emit `RequestIssued`.
    pub(crate) fn start(
        observer: &'a dyn SearchObserver,
        operation: Operation,
        target: impl Into<String>,
    ) -> Self {
        let invocation = Self {
            observer,
            request_id: RequestId::new(),
            operation,
            started: Instant::now(),
        };
        invocation.emit(SearchEventKind::RequestIssued {
            target: target.into(),
        });
        invocation
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn emit(&self, kind: SearchEventKind) {
        self.observer
            .on_event(&SearchEvent::new(self.request_id, self.operation, kind));
    }

    pub(crate) fn failed(&self, error: &ProscoutError) {
        self.emit(SearchEventKind::RequestFailed {
            failure: error.kind(),
            status: error.status(),
            message: error.to_string(),
        });
    }

    pub(crate) fn completed(&self, profiles: usize, total_count: u64) {
        self.emit(SearchEventKind::Completed {
            profiles,
            total_count,
            elapsed_ms: u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX),
        });
    }
}
