//! Resource APIs exposed by [`ProscoutClient`](crate::ProscoutClient).

pub mod connections;
pub mod introductions;
pub mod profiles;
pub mod search;

pub use connections::{ConnectionsApi, MutualConnectionsResponse};
pub use introductions::IntroductionsApi;
pub use profiles::{MatchesResponse, ProfilesApi};
pub use search::{SearchApi, SearchResponse};
