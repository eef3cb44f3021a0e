use serde::{Deserialize, Serialize};

/// Tutor as returned to callers, owner name substituted for owner id
///
/// `similarity_score` is omitted entirely when no semantic ranking ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub id: i64,
    pub name: String,
    pub subject: String,
    pub price_per_hour: f64,
    pub availability: String,
    pub whatsapp_number: String,
    pub location: String,
    pub bio: Option<String>,
    pub rating: f64,
    pub total_sessions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f32>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub embedding: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
