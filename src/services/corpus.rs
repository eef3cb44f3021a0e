use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::models::{CorpusEntry, TutorProfile, UserRef};

/// Errors that can occur while loading the tutor corpus
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Failed to read seed file: {0}")]
    SeedIoError(#[from] std::io::Error),

    #[error("Failed to parse seed file: {0}")]
    SeedParseError(#[from] serde_json::Error),

    #[error("Corpus configuration error: {0}")]
    ConfigError(String),
}

/// Read interface over the external profile and user stores
#[async_trait]
pub trait ProfileCorpus: Send + Sync {
    /// Every known tutor profile paired with its owner's current name
    ///
    /// Profiles whose owner cannot be resolved are left out. No ordering
    /// is guaranteed beyond being stable for an unchanged store.
    async fn load_all(&self) -> Result<Vec<CorpusEntry>, CorpusError>;

    /// Whether the backing store is reachable
    async fn health_check(&self) -> bool {
        true
    }
}

/// Keep profiles whose owner resolved, logging the ones that did not
pub fn retain_resolved<I>(rows: I) -> Vec<CorpusEntry>
where
    I: IntoIterator<Item = (TutorProfile, Option<UserRef>)>,
{
    rows.into_iter()
        .filter_map(|(profile, owner)| match owner {
            Some(owner) => Some(CorpusEntry::new(profile, owner)),
            None => {
                tracing::warn!(
                    "Excluding tutor {} from corpus: owner {} not found",
                    profile.id,
                    profile.user_id
                );
                None
            }
        })
        .collect()
}

/// Seed file layout: the user and tutor tables as JSON arrays
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorpusSeed {
    #[serde(default)]
    pub users: Vec<UserRef>,
    #[serde(default)]
    pub tutors: Vec<TutorProfile>,
}

/// Corpus held in memory, typically loaded from a seed file
///
/// Owners are resolved on every load, mirroring a join against a live
/// user table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    users: HashMap<i64, UserRef>,
    tutors: Vec<TutorProfile>,
}

impl InMemoryCorpus {
    pub fn new(users: Vec<UserRef>, tutors: Vec<TutorProfile>) -> Self {
        let users = users.into_iter().map(|u| (u.id, u)).collect();
        Self { users, tutors }
    }

    /// Load users and tutors from a JSON seed file
    pub async fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let raw = tokio::fs::read(path.as_ref()).await?;
        let seed: CorpusSeed = serde_json::from_slice(&raw)?;

        tracing::info!(
            "Loaded seed corpus from {}: {} users, {} tutors",
            path.as_ref().display(),
            seed.users.len(),
            seed.tutors.len()
        );

        Ok(Self::new(seed.users, seed.tutors))
    }

    /// Number of stored tutor profiles, resolved or not
    pub fn profile_count(&self) -> usize {
        self.tutors.len()
    }
}

#[async_trait]
impl ProfileCorpus for InMemoryCorpus {
    async fn load_all(&self) -> Result<Vec<CorpusEntry>, CorpusError> {
        let rows = self
            .tutors
            .iter()
            .map(|t| (t.clone(), self.users.get(&t.user_id).cloned()));

        Ok(retain_resolved(rows))
    }
}
