//! Profile lookup example.
//!
//! Fetches one profile, its suggested matches and the mutual connections
//! with the best match, then asks for an introduction.
//!
//! Run with: cargo run --example profile_lookup -- <profile-id>

use proscout_sdk::{IntroductionRequest, ProfileId, ProscoutClient, ProscoutResult};

#[tokio::main]
async fn main() -> ProscoutResult<()> {
    tracing_subscriber::fmt::init();

    let id = ProfileId::new(std::env::args().nth(1).unwrap_or_else(|| "p-1".to_string()));

    let client = ProscoutClient::builder()
        .base_url("http://localhost:8080")
        .api_key("sk-your-api-key")
        .build()?;

    let profile = client.profiles().try_get(&id).await?;
    println!("{}", profile.name);
    if let Some(affiliation) = &profile.affiliation {
        println!("  {}", affiliation);
    }
    for entry in &profile.education {
        println!("  studied at {}", entry.school);
    }

    let matches = client.profiles().matches(&id, 3).await;
    println!("\nTop matches:");
    for m in &matches {
        println!("  {:.2} {} {:?}", m.score, m.profile.name, m.reasons);
    }

    if let Some(best) = matches.first() {
        let mutual = client.connections().mutual(&id, &best.profile.id).await;
        println!("\n{} mutual connections with {}", mutual.len(), best.profile.name);

        let request = IntroductionRequest::new(
            id.clone(),
            best.profile.id.clone(),
            "Would be great to connect",
        );
        if client.introductions().request(&request).await {
            println!("Introduction requested");
        }
    }

    Ok(())
}
