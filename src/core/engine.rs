use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::core::{
    assembler::{assemble, Ranking},
    filters::filter_candidates,
    ranker::{apply_cutoffs, compose_candidates, rank_by_similarity, ComposedCandidate},
};
use crate::models::{CorpusEntry, RankedResult, SearchOptions, SearchQuery};
use crate::services::corpus::{CorpusError, ProfileCorpus};
use crate::services::embedding::{validate_batch, EmbeddingCapability, EmbeddingError, EmbeddingProvider};

/// Errors surfaced by a search
///
/// Only the profile store can fail a search; embedding problems always
/// degrade to unranked results instead.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Failed to load tutor corpus: {0}")]
    Corpus(#[from] CorpusError),
}

/// How the result order was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingStatus {
    /// Ordered by similarity to the query, scores attached
    Ranked,
    /// Empty query text, structured filters only
    NotRequested,
    /// No embedding provider configured or it failed its startup probe
    Unavailable,
    /// Provider error, invalid output or timeout during this request
    Degraded,
}

impl RankingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingStatus::Ranked => "ranked",
            RankingStatus::NotRequested => "not_requested",
            RankingStatus::Unavailable => "unavailable",
            RankingStatus::Degraded => "degraded",
        }
    }
}

/// Result of a search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<RankedResult>,
    pub ranking: RankingStatus,
    pub total_candidates: usize,
}

/// Hybrid tutor search orchestrator
///
/// # Pipeline Stages
/// 1. Load a fresh corpus snapshot
/// 2. Structured subject/location filter (always)
/// 3. Semantic ranking, only with non-empty query text and an available
///    embedding provider
/// 4. Result assembly
///
/// Holds no per-request state, so one engine serves concurrent searches.
#[derive(Clone)]
pub struct SearchEngine {
    corpus: Arc<dyn ProfileCorpus>,
    embeddings: EmbeddingCapability,
    options: SearchOptions,
}

impl SearchEngine {
    pub fn new(
        corpus: Arc<dyn ProfileCorpus>,
        embeddings: EmbeddingCapability,
        options: SearchOptions,
    ) -> Self {
        Self {
            corpus,
            embeddings,
            options,
        }
    }

    pub fn embeddings(&self) -> &EmbeddingCapability {
        &self.embeddings
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Whether the profile store is reachable
    pub async fn health_check(&self) -> bool {
        self.corpus.health_check().await
    }

    /// Run a search
    ///
    /// Returns an error only when the corpus cannot be loaded.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, SearchError> {
        let options = self.options.resolve(query);

        let corpus = self.corpus.load_all().await?;
        let total_candidates = corpus.len();

        let filtered = filter_candidates(corpus, query.subject.as_deref(), query.location.as_deref());

        let (ranking, status) = match (query.ranking_text(), self.embeddings.provider()) {
            (None, _) => (Ranking::Unranked(filtered), RankingStatus::NotRequested),
            (Some(_), None) => (Ranking::Unranked(filtered), RankingStatus::Unavailable),
            (Some(text), Some(provider)) => self.rank(text, provider, filtered, &options).await,
        };

        let ranking = match ranking {
            Ranking::Ranked(scored) => Ranking::Ranked(apply_cutoffs(scored, &options)),
            Ranking::Unranked(mut entries) => {
                if let Some(top_k) = options.top_k {
                    entries.truncate(top_k);
                }
                Ranking::Unranked(entries)
            }
        };

        let results = assemble(ranking);

        tracing::info!(
            "Search returned {} of {} tutors (ranking: {})",
            results.len(),
            total_candidates,
            status.as_str()
        );

        Ok(SearchOutcome {
            results,
            ranking: status,
            total_candidates,
        })
    }

    /// Rank the filtered pool, falling back to its original order on any
    /// embedding failure
    async fn rank(
        &self,
        text: &str,
        provider: &Arc<dyn EmbeddingProvider>,
        filtered: Vec<CorpusEntry>,
        options: &SearchOptions,
    ) -> (Ranking, RankingStatus) {
        if filtered.is_empty() {
            return (Ranking::Ranked(Vec::new()), RankingStatus::Ranked);
        }

        let composed = compose_candidates(filtered);

        // query first, then candidates, in one batch
        let mut batch = Vec::with_capacity(composed.len() + 1);
        batch.push(text.to_string());
        batch.extend(composed.iter().map(|c| c.text.clone()));

        match embed_with_timeout(provider.as_ref(), &batch, options.embed_timeout).await {
            Ok(mut vectors) => {
                let query_vector = vectors.remove(0);
                let ranked = rank_by_similarity(&query_vector, composed, &vectors);
                (Ranking::Ranked(ranked), RankingStatus::Ranked)
            }
            Err(e) => {
                tracing::warn!(
                    "Semantic ranking via {} failed, returning unranked results: {}",
                    provider.name(),
                    e
                );
                (Ranking::Unranked(into_entries(composed)), RankingStatus::Degraded)
            }
        }
    }
}

fn into_entries(composed: Vec<ComposedCandidate>) -> Vec<CorpusEntry> {
    composed.into_iter().map(|c| c.entry).collect()
}

/// Embed a batch, bounded by `timeout`, and validate the provider output
async fn embed_with_timeout(
    provider: &dyn EmbeddingProvider,
    batch: &[String],
    timeout: Duration,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let vectors = tokio::time::timeout(timeout, provider.embed(batch))
        .await
        .map_err(|_| {
            EmbeddingError::Unavailable(format!("timed out after {}ms", timeout.as_millis()))
        })??;

    validate_batch(batch.len(), provider.dimension(), &vectors)?;

    Ok(vectors)
}
