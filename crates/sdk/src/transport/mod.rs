//! Transport layer for the Proscout SDK.

pub mod http;
pub mod websocket;

pub use http::HttpTransport;
pub use websocket::StreamingSearch;
