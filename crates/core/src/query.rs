use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result cap used when the caller does not set one
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Errors raised while building a [`SearchQuery`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("max_results must be at least 1")]
    ZeroMaxResults,

    #[error("filter key must not be empty")]
    EmptyFilterKey,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Value of a single filter: one value or any-of a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Single(String),
    Many(Vec<String>),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Sort key plus direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    pub order: SortOrder,
}

/// A query for the profile-search service.
///
/// Built once through [`SearchQuery::new`] or [`SearchQuery::builder`] and
/// read-only afterwards. Filters live in a sorted map so the encoded form is
/// the same for equal queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    filters: BTreeMap<String, FilterValue>,
    max_results: usize,
    sort: Option<SortSpec>,
}

impl SearchQuery {
    /// Plain text query with no filters and the default cap
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filters: BTreeMap::new(),
            max_results: DEFAULT_MAX_RESULTS,
            sort: None,
        }
    }

    pub fn builder(text: impl Into<String>) -> SearchQueryBuilder {
        SearchQueryBuilder::new(text)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn filters(&self) -> &BTreeMap<String, FilterValue> {
        &self.filters
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Payload shared by the HTTP parameters and the streamed `query` message
    pub fn to_payload(&self) -> QueryPayload {
        QueryPayload {
            query: self.text.clone(),
            filters: self.filters.clone(),
            max_results: self.max_results,
            sort_by: self.sort.as_ref().map(|s| s.key.clone()),
            sort_order: self.sort.as_ref().map(|s| s.order),
        }
    }

    /// Encode as HTTP query parameters.
    ///
    /// Filters travel as a single JSON object under `filters`; the parameter
    /// is omitted when no filter is set.
    pub fn to_query_params(&self) -> Result<Vec<(&'static str, String)>, serde_json::Error> {
        let mut params = vec![
            ("q", self.text.clone()),
            ("limit", self.max_results.to_string()),
        ];

        if let Some(sort) = &self.sort {
            params.push(("sort_by", sort.key.clone()));
            params.push(("sort_order", sort.order.as_str().to_string()));
        }

        if !self.filters.is_empty() {
            params.push(("filters", serde_json::to_string(&self.filters)?));
        }

        Ok(params)
    }
}

/// Wire form of a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPayload {
    pub query: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub filters: BTreeMap<String, FilterValue>,
    pub max_results: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

/// Builder for [`SearchQuery`]
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    text: String,
    filters: BTreeMap<String, FilterValue>,
    max_results: usize,
    sort: Option<SortSpec>,
}

impl SearchQueryBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filters: BTreeMap::new(),
            max_results: DEFAULT_MAX_RESULTS,
            sort: None,
        }
    }

    /// Add a filter; a repeated key replaces the earlier value
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn sort_by(mut self, key: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(SortSpec {
            key: key.into(),
            order,
        });
        self
    }

    pub fn build(self) -> Result<SearchQuery, QueryError> {
        if self.max_results == 0 {
            return Err(QueryError::ZeroMaxResults);
        }
        if self.filters.keys().any(|k| k.trim().is_empty()) {
            return Err(QueryError::EmptyFilterKey);
        }

        Ok(SearchQuery {
            text: self.text,
            filters: self.filters,
            max_results: self.max_results,
            sort: self.sort,
        })
    }
}
