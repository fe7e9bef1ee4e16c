use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use proscout_sdk::{
    FilterValue, IntroductionRequest, ProfileId, ProscoutClient, SearchQuery, SortOrder,
};
use serde_json::Value;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search profiles by free text and filters
    Search(SearchArgs),

    /// Fetch a single profile
    Profile {
        /// Profile identifier
        id: String,
    },

    /// List profiles suggested for a profile
    Matches {
        /// Profile identifier
        id: String,

        /// Maximum number of matches
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// List connections shared by two profiles
    Mutual {
        /// First profile identifier
        from: String,

        /// Second profile identifier
        to: String,
    },

    /// Ask for an introduction between two profiles
    Introduce {
        /// Profile asking for the introduction
        from: String,

        /// Profile to be introduced to
        to: String,

        /// Message passed to the introducer
        #[arg(short, long)]
        message: String,

        /// Optional context for the introduction
        #[arg(long)]
        context: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Free-text query
    pub query: String,

    /// Filter as key=value; use key=a,b for a list of values
    #[arg(short, long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, FilterValue)>,

    /// Maximum number of profiles to return
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Field to sort by
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction (asc or desc)
    #[arg(long, default_value = "desc")]
    pub order: SortOrder,

    /// Use the streamed channel instead of a single request
    #[arg(long)]
    pub stream: bool,

    /// Fail instead of printing an empty result when the request fails
    #[arg(long, conflicts_with = "stream")]
    pub strict: bool,
}

impl SearchArgs {
    pub fn to_query(&self) -> Result<SearchQuery> {
        let mut builder = SearchQuery::builder(&self.query);
        for (key, value) in &self.filters {
            builder = builder.filter(key, value.clone());
        }
        if let Some(limit) = self.limit {
            builder = builder.max_results(limit);
        }
        if let Some(sort_by) = &self.sort_by {
            builder = builder.sort_by(sort_by, self.order);
        }
        builder.build().context("Invalid search query")
    }
}

/// Parse a `key=value` filter; a comma-separated value becomes a list.
pub fn parse_filter(raw: &str) -> Result<(String, FilterValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing filter key in '{}'", raw));
    }

    let value = if value.contains(',') {
        FilterValue::Many(
            value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect(),
        )
    } else {
        FilterValue::Single(value.trim().to_string())
    };

    Ok((key.to_string(), value))
}

impl Command {
    /// Run the command and return what should be printed.
    pub async fn run(self, client: &ProscoutClient) -> Result<Value> {
        let output = match self {
            Command::Search(args) => {
                let query = args.to_query()?;
                tracing::info!("Searching for '{}'", query.text());

                let result = if args.stream {
                    client.search().stream(&query).await?
                } else if args.strict {
                    client.search().try_execute(&query).await?
                } else {
                    client.search().execute(&query).await
                };
                serde_json::to_value(result)?
            }
            Command::Profile { id } => {
                let profile = client
                    .profiles()
                    .try_get(&ProfileId::new(id.clone()))
                    .await
                    .with_context(|| format!("Failed to fetch profile {}", id))?;
                serde_json::to_value(profile)?
            }
            Command::Matches { id, limit } => {
                let matches = client
                    .profiles()
                    .try_matches(&ProfileId::new(id.clone()), limit)
                    .await
                    .with_context(|| format!("Failed to fetch matches for {}", id))?;
                serde_json::to_value(matches)?
            }
            Command::Mutual { from, to } => {
                let names = client
                    .connections()
                    .try_mutual(&ProfileId::new(from), &ProfileId::new(to))
                    .await
                    .context("Failed to fetch mutual connections")?;
                serde_json::to_value(names)?
            }
            Command::Introduce {
                from,
                to,
                message,
                context,
            } => {
                if message.trim().is_empty() {
                    bail!("introduction message must not be empty");
                }
                let mut request = IntroductionRequest::new(from, to, message);
                if let Some(context) = context {
                    request = request.with_context(context);
                }
                client
                    .introductions()
                    .try_request(&request)
                    .await
                    .context("Failed to request introduction")?;
                serde_json::json!({ "requested": true })
            }
        };

        Ok(output)
    }
}
