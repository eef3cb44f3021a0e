use crate::core::{composer::compose_profile_text, similarity::cosine_similarity};
use crate::models::{CorpusEntry, SearchOptions};

/// A filtered candidate together with its composed search text
#[derive(Debug, Clone)]
pub struct ComposedCandidate {
    pub entry: CorpusEntry,
    pub text: String,
}

/// A candidate after similarity scoring
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub entry: CorpusEntry,
    pub text: String,
    pub score: f32,
}

/// Attach composed text to every candidate, preserving order
pub fn compose_candidates(entries: Vec<CorpusEntry>) -> Vec<ComposedCandidate> {
    entries
        .into_iter()
        .map(|entry| {
            let text = compose_profile_text(&entry.profile, &entry.owner);
            ComposedCandidate { entry, text }
        })
        .collect()
}

/// Score candidates against the query vector and order them
///
/// `vectors[i]` must be the embedding of `candidates[i].text`; the caller
/// validates counts before ranking. Sorting is stable on descending score,
/// so tied candidates keep their filtered-input order. The score is
/// attached while sorting rather than looked up afterwards.
pub fn rank_by_similarity(
    query_vector: &[f32],
    candidates: Vec<ComposedCandidate>,
    vectors: &[Vec<f32>],
) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .zip(vectors.iter())
        .map(|(candidate, vector)| ScoredCandidate {
            score: cosine_similarity(query_vector, vector),
            entry: candidate.entry,
            text: candidate.text,
        })
        .collect();

    // slice::sort_by is stable; total_cmp gives a total order on f32
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    scored
}

/// Apply the minimum-score threshold and top-K limit to a ranked list
pub fn apply_cutoffs(mut ranked: Vec<ScoredCandidate>, options: &SearchOptions) -> Vec<ScoredCandidate> {
    if let Some(min_score) = options.min_score {
        ranked.retain(|c| c.score >= min_score);
    }

    if let Some(top_k) = options.top_k {
        ranked.truncate(top_k);
    }

    ranked
}
