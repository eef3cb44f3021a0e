use crate::core::ranker::ScoredCandidate;
use crate::models::{CorpusEntry, RankedResult};

/// Outcome of the filter/rank stages handed to the assembler
///
/// Scores live only on the `Ranked` variant, so a single response either
/// carries a similarity score on every result or on none of them.
#[derive(Debug, Clone)]
pub enum Ranking {
    Ranked(Vec<ScoredCandidate>),
    Unranked(Vec<CorpusEntry>),
}

/// Flatten a candidate into the response shape
fn flatten(entry: CorpusEntry, similarity_score: Option<f32>) -> RankedResult {
    let CorpusEntry { profile, owner } = entry;

    RankedResult {
        id: profile.id,
        name: owner.name,
        subject: profile.subject,
        price_per_hour: profile.price_per_hour,
        availability: profile.availability,
        whatsapp_number: profile.whatsapp_number,
        location: profile.location,
        bio: profile.bio,
        rating: profile.rating,
        total_sessions: profile.total_sessions,
        similarity_score,
    }
}

/// Build the response list, keeping the order given
pub fn assemble(ranking: Ranking) -> Vec<RankedResult> {
    match ranking {
        Ranking::Ranked(scored) => scored
            .into_iter()
            .map(|c| flatten(c.entry, Some(c.score)))
            .collect(),
        Ranking::Unranked(entries) => entries
            .into_iter()
            .map(|entry| flatten(entry, None))
            .collect(),
    }
}
