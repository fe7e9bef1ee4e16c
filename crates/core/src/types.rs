use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque identifier of a profile on the remote service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl ProfileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProfileId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProfileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single normalized professional profile.
///
/// Every list and optional field defaults when the server leaves it out, so a
/// sparse payload such as `{"id": "p1", "name": "Ada"}` still decodes. Fields
/// the model does not know about are kept in `extra` rather than dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: ProfileId,
    #[serde(default, alias = "fullName")]
    pub name: String,
    /// Headline or current company summary
    #[serde(default, alias = "headline")]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "summary")]
    pub bio: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "graduationYear"
    )]
    pub graduation_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "profileUrl")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "avatarUrl")]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProfileRecord {
    pub fn new(id: impl Into<ProfileId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            affiliation: None,
            education: Vec::new(),
            experience: Vec::new(),
            interests: Vec::new(),
            skills: Vec::new(),
            location: None,
            bio: None,
            graduation_year: None,
            profile_url: None,
            avatar_url: None,
            extra: BTreeMap::new(),
        }
    }

    /// The most recent position, if the server listed any
    pub fn current_position(&self) -> Option<&ExperienceEntry> {
        self.experience.iter().find(|e| e.end_date.is_none())
    }
}

/// One education entry, in the order the server returned it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(alias = "institution")]
    pub school: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "fieldOfStudy")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "startYear")]
    pub start_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "endYear")]
    pub end_year: Option<u16>,
}

/// One experience entry, in the order the server returned it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    #[serde(default, alias = "position")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "endDate")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A candidate profile scored against another profile by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMatch {
    pub profile: ProfileRecord,
    #[serde(alias = "matchScore")]
    pub score: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
}

/// Body of an introduction request between two profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroductionRequest {
    pub from_id: ProfileId,
    pub to_id: ProfileId,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl IntroductionRequest {
    pub fn new(
        from_id: impl Into<ProfileId>,
        to_id: impl Into<ProfileId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
