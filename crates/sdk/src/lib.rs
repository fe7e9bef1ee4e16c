//! # Proscout SDK
//!
//! Async client for a professional-profile search service.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use proscout_sdk::{ProscoutClient, ProscoutResult, SearchQuery};
//!
//! #[tokio::main]
//! async fn main() -> ProscoutResult<()> {
//!     let client = ProscoutClient::builder()
//!         .base_url("https://search.example.com")
//!         .api_key("sk-your-api-key")
//!         .build()?;
//!
//!     // Failures degrade to an empty result and are reported to the observer
//!     let result = client.search().execute(&SearchQuery::new("rust engineers")).await;
//!     println!("{} of {} profiles", result.len(), result.total_count);
//!
//!     // Typed errors when the caller needs to tell failures apart
//!     match client.search().try_execute(&SearchQuery::new("rust engineers")).await {
//!         Ok(result) => println!("{} profiles", result.len()),
//!         Err(e) if e.is_authentication() => eprintln!("check your API key"),
//!         Err(e) => eprintln!("search failed: {}", e),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Streamed Search
//!
//! ```rust,no_run
//! use proscout_sdk::{ProscoutClient, SearchQuery, SortOrder};
//!
//! # async fn example() -> proscout_sdk::ProscoutResult<()> {
//! let client = ProscoutClient::builder()
//!     .base_url("https://search.example.com")
//!     .api_key("sk-your-api-key")
//!     .build()?;
//!
//! let query = SearchQuery::builder("climate tech founders")
//!     .filter("school", "MIT")
//!     .max_results(25)
//!     .sort_by("relevance", SortOrder::Desc)
//!     .build()?;
//!
//! let result = client.search().stream(&query).await?;
//! for profile in &result.profiles {
//!     println!("{} ({})", profile.name, profile.id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
mod diagnostics;
pub mod error;
pub mod transport;

pub use client::{ProscoutClient, ProscoutClientBuilder};
pub use config::{ClientConfig, RetryConfig, DEFAULT_STREAM_DEADLINE, DEFAULT_TIMEOUT};
pub use error::{ProscoutError, ProscoutResult};

// Re-export core types for convenience
pub use proscout_core::{
    // Query and result
    FilterValue, QueryError, SearchQuery, SearchQueryBuilder, SearchResult, SortOrder,
    DEFAULT_MAX_RESULTS,
    // Profiles
    EducationEntry, ExperienceEntry, IntroductionRequest, ProfileId, ProfileMatch, ProfileRecord,
    // Observability
    CloseReason, FailureKind, FanoutObserver, Operation, RecordingObserver, RequestId,
    SearchEvent, SearchEventKind, SearchObserver, TracingObserver,
};
