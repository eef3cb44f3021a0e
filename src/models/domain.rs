use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tutor profile as stored by the profile store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TutorProfile {
    pub id: i64,
    pub user_id: i64,
    pub subject: String,
    pub price_per_hour: f64,
    pub availability: String,
    pub whatsapp_number: String,
    pub location: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_sessions: u32,
}

/// Read-only projection of the owning user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: i64,
    pub name: String,
}

/// A tutor profile paired with its resolved owner
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusEntry {
    pub profile: TutorProfile,
    pub owner: UserRef,
}

impl CorpusEntry {
    pub fn new(profile: TutorProfile, owner: UserRef) -> Self {
        Self { profile, owner }
    }
}

/// Per-request search input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub text: String,
    pub subject: Option<String>,
    pub location: Option<String>,
    pub top_k: Option<usize>,
    pub min_score: Option<f32>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Query text with surrounding whitespace removed, `None` when blank
    pub fn ranking_text(&self) -> Option<&str> {
        let trimmed = self.text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Engine-wide defaults for result shaping and embedding latency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub top_k: Option<usize>,
    pub min_score: Option<f32>,
    pub embed_timeout: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_k: None,
            min_score: None,
            embed_timeout: Duration::from_millis(2000),
        }
    }
}

impl SearchOptions {
    /// Request-level overrides win over the configured defaults
    pub fn resolve(&self, query: &SearchQuery) -> Self {
        Self {
            top_k: query.top_k.or(self.top_k),
            min_score: query.min_score.or(self.min_score),
            embed_timeout: self.embed_timeout,
        }
    }
}
