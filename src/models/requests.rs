use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::SearchQuery;

/// Query string of the tutor search endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchTutorsRequest {
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub query: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, rename = "topK")]
    #[validate(range(min = 1, max = 500))]
    pub top_k: Option<usize>,
    #[serde(default, rename = "minScore")]
    #[validate(range(min = -1.0, max = 1.0))]
    pub min_score: Option<f32>,
}

impl From<SearchTutorsRequest> for SearchQuery {
    fn from(req: SearchTutorsRequest) -> Self {
        SearchQuery {
            text: req.query,
            subject: req.subject,
            location: req.location,
            top_k: req.top_k,
            // NaN would compare false against every score
            min_score: req.min_score.filter(|s| !s.is_nan()),
        }
    }
}
