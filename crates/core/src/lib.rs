// Core types for the Proscout profile-search client

pub mod events;
pub mod observer;
pub mod query;
pub mod result;
pub mod stream;
pub mod types;

pub use events::{CloseReason, FailureKind, Operation, RequestId, SearchEvent, SearchEventKind};
pub use observer::{FanoutObserver, RecordingObserver, SearchObserver, TracingObserver};
pub use query::{
    FilterValue, QueryError, QueryPayload, SearchQuery, SearchQueryBuilder, SortOrder, SortSpec,
    DEFAULT_MAX_RESULTS,
};
pub use result::{deserialize_millis, SearchResult};
pub use stream::{StreamCollector, StreamMessage, StreamRequest, StreamTermination};
pub use types::*;
