// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{TutorProfile, UserRef, CorpusEntry, SearchQuery, SearchOptions};
pub use requests::SearchTutorsRequest;
pub use responses::{RankedResult, HealthResponse, ErrorResponse};
