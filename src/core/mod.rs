// Core algorithm exports
pub mod assembler;
pub mod composer;
pub mod engine;
pub mod filters;
pub mod ranker;
pub mod similarity;

pub use assembler::{assemble, Ranking};
pub use composer::compose_profile_text;
pub use engine::{SearchEngine, SearchError, SearchOutcome, RankingStatus};
pub use filters::{filter_candidates, matches_structured_filters};
pub use ranker::{apply_cutoffs, compose_candidates, rank_by_similarity, ComposedCandidate, ScoredCandidate};
pub use similarity::cosine_similarity;
