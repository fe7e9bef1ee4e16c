//! Basic SDK usage example.
//!
//! This example demonstrates how to build a client and run a filtered
//! search over HTTP.
//!
//! Run with: cargo run --example basic_search

use proscout_sdk::{ProscoutClient, ProscoutResult, SearchQuery, SortOrder};
use std::time::Duration;

#[tokio::main]
async fn main() -> ProscoutResult<()> {
    // Initialize tracing so failed requests show up in the log
    tracing_subscriber::fmt::init();

    let client = ProscoutClient::builder()
        .base_url("http://localhost:8080")
        .api_key("sk-your-api-key")
        .timeout(Duration::from_secs(10))
        .build()?;

    let query = SearchQuery::builder("machine learning researchers")
        .filter("location", "Berlin")
        .filter("skills", vec!["pytorch", "jax"])
        .max_results(5)
        .sort_by("relevance", SortOrder::Desc)
        .build()?;

    // Degrading form: never fails, reports problems through tracing
    let result = client.search().execute(&query).await;
    println!(
        "Found {} of {} profiles in {} ms",
        result.len(),
        result.total_count,
        result.execution_time_ms
    );

    for profile in &result.profiles {
        match profile.current_position() {
            Some(role) => println!("  {} - {} at {}", profile.name, role.title, role.company),
            None => println!("  {}", profile.name),
        }
    }

    // Strict form: distinguishes rejected credentials from an empty result
    match client.search().try_execute(&query).await {
        Ok(result) if result.is_empty() => println!("\nNo matches"),
        Ok(result) => println!("\n{} matches", result.len()),
        Err(e) if e.is_authentication() => eprintln!("\nAPI key rejected: {}", e),
        Err(e) => eprintln!("\nSearch failed: {}", e),
    }

    Ok(())
}
