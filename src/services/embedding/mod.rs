//! Embedding providers
//!
//! A provider maps a batch of texts to one fixed-dimension vector per text,
//! in input order. Availability is decided once at startup and carried as
//! an [`EmbeddingCapability`]; callers check it before ranking instead of
//! catching errors per call.

pub mod cache;
pub mod hash;
pub mod http;
#[cfg(feature = "local-model")]
pub mod local;
pub mod serial;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::EmbeddingSettings;

pub use cache::CachedProvider;
pub use hash::HashEmbedder;
pub use http::HttpEmbeddingProvider;
pub use serial::SerializedProvider;

/// Text used to probe a backend at startup
const PROBE_TEXT: &str = "availability probe";

/// Errors that can occur while producing embeddings
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Embedding backend unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Inference API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Unauthorized: invalid inference API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Model error: {0}")]
    Backend(String),

    #[error("Embedding task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// A text embedding backend
///
/// Implementations must be safe to call concurrently. Backends whose
/// underlying model is not thread-safe are wrapped in a
/// [`SerializedProvider`].
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a batch of texts, one vector per input, order preserved
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Vector dimension, if known ahead of time
    fn dimension(&self) -> Option<usize>;

    /// Backend/model name for logs and health output
    fn name(&self) -> &str;
}

/// Check a provider response against its request
///
/// Every vector must be present and share one dimension. When the
/// provider declares a dimension, the shared one must equal it.
pub fn validate_batch(
    expected: usize,
    dimension: Option<usize>,
    vectors: &[Vec<f32>],
) -> Result<(), EmbeddingError> {
    if vectors.len() != expected {
        return Err(EmbeddingError::CountMismatch {
            expected,
            actual: vectors.len(),
        });
    }

    if let Some(first) = vectors.first() {
        let dim = dimension.unwrap_or(first.len());
        if dim == 0 || first.is_empty() {
            return Err(EmbeddingError::InvalidResponse("empty embedding vector".into()));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dim) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dim,
                actual: bad.len(),
            });
        }
    }

    Ok(())
}

/// Embedding capability injected into the search engine
#[derive(Clone)]
pub enum EmbeddingCapability {
    Available(Arc<dyn EmbeddingProvider>),
    Unavailable { reason: String },
}

impl std::fmt::Debug for EmbeddingCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(provider) => f.debug_tuple("Available").field(&provider.name()).finish(),
            Self::Unavailable { reason } => f.debug_struct("Unavailable").field("reason", reason).finish(),
        }
    }
}

impl EmbeddingCapability {
    pub fn available(provider: impl EmbeddingProvider + 'static) -> Self {
        Self::Available(Arc::new(provider))
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable { reason: reason.into() }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    pub fn provider(&self) -> Option<&Arc<dyn EmbeddingProvider>> {
        match self {
            Self::Available(provider) => Some(provider),
            Self::Unavailable { .. } => None,
        }
    }

    /// Short label for health output
    pub fn label(&self) -> String {
        match self {
            Self::Available(provider) => provider.name().to_string(),
            Self::Unavailable { .. } => "unavailable".to_string(),
        }
    }

    /// Build the configured provider and decide availability once
    ///
    /// Never fails: any construction or probe error yields `Unavailable`
    /// with the reason logged.
    pub async fn probe(settings: &EmbeddingSettings) -> Self {
        let provider = match build_provider(settings).await {
            Ok(Some(provider)) => provider,
            Ok(None) => {
                tracing::info!("Semantic ranking disabled (embedding backend: none)");
                return Self::unavailable("embedding backend disabled");
            }
            Err(e) => {
                tracing::warn!("Embedding provider could not be created: {}", e);
                return Self::unavailable(e.to_string());
            }
        };

        if settings.probe_on_start {
            let timeout = Duration::from_millis(settings.timeout_ms);
            let probe = vec![PROBE_TEXT.to_string()];

            let outcome = match tokio::time::timeout(timeout, provider.embed(&probe)).await {
                Ok(Ok(vectors)) => validate_batch(1, provider.dimension(), &vectors),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(EmbeddingError::Unavailable(format!(
                    "probe timed out after {}ms",
                    settings.timeout_ms
                ))),
            };

            if let Err(e) = outcome {
                tracing::warn!("Embedding provider {} failed its startup probe: {}", provider.name(), e);
                return Self::unavailable(e.to_string());
            }
        }

        tracing::info!("Embedding provider ready: {}", provider.name());
        Self::Available(provider)
    }
}

/// Construct the backend named in settings, wrapped in the configured decorators
///
/// Returns `Ok(None)` when embeddings are switched off.
pub async fn build_provider(
    settings: &EmbeddingSettings,
) -> Result<Option<Arc<dyn EmbeddingProvider>>, EmbeddingError> {
    let backend = settings.backend.trim().to_lowercase();

    let (base, serialize): (Arc<dyn EmbeddingProvider>, bool) = match backend.as_str() {
        "" | "none" | "disabled" => return Ok(None),
        "hash" => {
            if settings.dimension == 0 {
                return Err(EmbeddingError::Unavailable(
                    "embedding.dimension must be greater than 0".into(),
                ));
            }
            (Arc::new(HashEmbedder::new(settings.dimension)), settings.serialize)
        }
        "http" => {
            let endpoint = settings
                .endpoint
                .as_deref()
                .filter(|e| !e.trim().is_empty())
                .ok_or_else(|| EmbeddingError::Unavailable("embedding.endpoint is not set".into()))?;
            let provider = HttpEmbeddingProvider::new(
                endpoint,
                settings.api_key.clone(),
                &settings.model,
                Duration::from_millis(settings.timeout_ms),
            )?;
            (Arc::new(provider), settings.serialize)
        }
        #[cfg(feature = "local-model")]
        "local" => {
            // loading may download model files
            let model = settings.model.clone();
            let provider =
                tokio::task::spawn_blocking(move || local::LocalModelProvider::new(&model)).await??;
            (Arc::new(provider), true)
        }
        #[cfg(not(feature = "local-model"))]
        "local" => {
            return Err(EmbeddingError::Unavailable(
                "embedding.backend=local requires the local-model feature".into(),
            ))
        }
        other => {
            return Err(EmbeddingError::Unavailable(format!(
                "unknown embedding backend: {}",
                other
            )))
        }
    };

    let mut provider = base;
    if serialize {
        provider = Arc::new(SerializedProvider::new(provider));
    }
    if settings.cache_size > 0 {
        provider = Arc::new(CachedProvider::new(provider, settings.cache_size));
    }

    Ok(Some(provider))
}
