//! Streamed search example.
//!
//! Opens a WebSocket channel, sends one query and collects result chunks
//! until the service signals completion or the deadline elapses.
//!
//! Run with: cargo run --example streamed_search

use proscout_sdk::{
    FanoutObserver, ProscoutClient, ProscoutResult, RecordingObserver, SearchEventKind,
    SearchQuery, TracingObserver,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> ProscoutResult<()> {
    tracing_subscriber::fmt::init();

    // Record events alongside the default tracing output
    let recorder = Arc::new(RecordingObserver::new());
    let observer = FanoutObserver::new()
        .with(Arc::new(TracingObserver))
        .with(recorder.clone());

    let client = ProscoutClient::builder()
        .base_url("http://localhost:8080")
        .api_key("sk-your-api-key")
        .stream_deadline(Duration::from_secs(15))
        .observer(Arc::new(observer))
        .build()?;

    let query = SearchQuery::builder("founders in climate tech")
        .max_results(20)
        .build()?;

    match client.search().stream(&query).await {
        Ok(result) => {
            println!("Received {} profiles (total {})", result.len(), result.total_count);
            for profile in &result.profiles {
                println!("  {} ({})", profile.name, profile.id);
            }
        }
        Err(e) => eprintln!("Stream failed: {}", e),
    }

    let partial = recorder.count_where(|k| matches!(k, SearchEventKind::DeadlineElapsed { .. }));
    if partial > 0 {
        println!("Deadline elapsed; results above are partial");
    }

    Ok(())
}
