use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use edubridge_search::config::{CorpusBackend, Settings};
use edubridge_search::routes::{self, tutors::AppState};
use edubridge_search::services::{EmbeddingCapability, InMemoryCorpus, PostgresCorpus, ProfileCorpus};
use edubridge_search::SearchEngine;
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

/// JSON error response for malformed query strings
#[derive(Debug, serde::Serialize)]
pub struct QueryError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for QueryError {}

impl error::ResponseError for QueryError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    QueryError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_tracing(default_level: &str, default_format: &str) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| default_level.to_string());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| default_format.to_string());

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

async fn build_corpus(settings: &Settings) -> std::io::Result<Arc<dyn ProfileCorpus>> {
    match settings.corpus.backend {
        CorpusBackend::Memory => {
            let corpus = InMemoryCorpus::from_seed_file(&settings.corpus.seed_file)
                .await
                .map_err(|e| {
                    error!("Failed to load seed corpus {}: {}", settings.corpus.seed_file, e);
                    std::io::Error::new(std::io::ErrorKind::Other, e)
                })?;
            if corpus.profile_count() == 0 {
                tracing::warn!("Seed corpus {} has no tutor profiles", settings.corpus.seed_file);
            }
            Ok(Arc::new(corpus))
        }
        CorpusBackend::Postgres => {
            // validate() guarantees the section exists for this backend
            let Some(database) = settings.database.as_ref() else {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "postgres corpus requires database settings",
                ));
            };

            let corpus = PostgresCorpus::from_settings(database).await.map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e)
            })?;
            Ok(Arc::new(corpus))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load();

    match &settings {
        Ok(s) => init_tracing(&s.logging.level, &s.logging.format),
        Err(_) => init_tracing("info", "compact"),
    }

    info!("Starting EduBridge tutor search service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Configuration loaded successfully");

    let corpus = build_corpus(&settings).await?;

    info!("Tutor corpus initialized ({:?} backend)", settings.corpus.backend);

    let embeddings = EmbeddingCapability::probe(&settings.embedding).await;

    let options = settings.search_options();
    info!(
        "Search engine initialized (embedding: {}, top_k: {:?}, min_score: {:?}, timeout: {:?})",
        embeddings.label(),
        options.top_k,
        options.min_score,
        options.embed_timeout
    );

    let app_state = AppState {
        engine: Arc::new(SearchEngine::new(corpus, embeddings, options)),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
