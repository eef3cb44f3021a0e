use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::Instrument;
use validator::Validate;

use crate::core::{SearchEngine, SearchError};
use crate::models::{ErrorResponse, HealthResponse, SearchQuery, SearchTutorsRequest};

/// Header reporting how the result order was produced
pub const RANKING_HEADER: &str = "X-Search-Ranking";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

/// Configure all tutor discovery routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/tutors", web::get().to(list_tutors))
        .route("/tutors/search", web::get().to(search_tutors));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.engine.health_check().await;

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        embedding: state.engine.embeddings().label(),
        timestamp: chrono::Utc::now(),
    })
}

/// List every tutor, unranked
///
/// GET /api/tutors
async fn list_tutors(state: web::Data<AppState>) -> impl Responder {
    run_search(&state, SearchQuery::default()).await
}

/// Hybrid tutor search
///
/// GET /api/tutors/search?query=...&subject=...&location=...&topK=...&minScore=...
///
/// Responds with a JSON array of tutors. `similarity_score` is present on
/// every element when semantic ranking ran and absent on all of them
/// otherwise.
async fn search_tutors(
    state: web::Data<AppState>,
    req: web::Query<SearchTutorsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    run_search(&state, SearchQuery::from(req.into_inner())).await
}

async fn run_search(state: &AppState, query: SearchQuery) -> HttpResponse {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("search", %request_id);

    let outcome = state.engine.search(&query).instrument(span).await;

    match outcome {
        Ok(outcome) => HttpResponse::Ok()
            .insert_header((RANKING_HEADER, outcome.ranking.as_str()))
            .json(outcome.results),
        Err(SearchError::Corpus(e)) => {
            tracing::error!("Search {} failed to load tutor corpus: {}", request_id, e);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "Tutor directory unavailable".to_string(),
                message: e.to_string(),
                status_code: 503,
            })
        }
    }
}
