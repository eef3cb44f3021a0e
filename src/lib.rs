//! EduBridge Search - hybrid tutor discovery service
//!
//! Combines case-insensitive structured filtering (subject, location) with
//! semantic similarity between a free-text query and each tutor's composed
//! profile text. Semantic ranking is an optional capability: without an
//! embedding provider, or when it fails or times out, searches return the
//! filtered tutors unranked.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{SearchEngine, SearchOutcome, RankingStatus, cosine_similarity, compose_profile_text};
pub use models::{TutorProfile, UserRef, CorpusEntry, SearchQuery, SearchOptions, RankedResult};
pub use services::{EmbeddingCapability, EmbeddingProvider, ProfileCorpus, InMemoryCorpus};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let profile = TutorProfile {
            id: 1,
            user_id: 2,
            subject: "Biology".to_string(),
            price_per_hour: 32.0,
            availability: "Tuesday, Thursday 4-7 PM".to_string(),
            whatsapp_number: "+1234567895".to_string(),
            location: "Miami, FL".to_string(),
            bio: None,
            rating: 0.0,
            total_sessions: 0,
        };
        let owner = UserRef { id: 2, name: "Robert Taylor".to_string() };

        assert_eq!(compose_profile_text(&profile, &owner), "Robert Taylor Biology  Miami, FL");
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), 1.0);
    }
}
