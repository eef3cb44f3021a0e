use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Arc;

use super::{EmbeddingError, EmbeddingProvider};

/// In-process sentence embedding model
///
/// Model files are downloaded to the fastembed cache on first use.
/// Inference is CPU-bound and runs on the blocking pool.
pub struct LocalModelProvider {
    model: Arc<TextEmbedding>,
    model_name: String,
    dimension: usize,
}

impl LocalModelProvider {
    pub fn new(model_name: &str) -> Result<Self, EmbeddingError> {
        let (model, dimension) = match model_name {
            "all-MiniLM-L6-v2" | "all-minilm-l6-v2" => (EmbeddingModel::AllMiniLML6V2, 384),
            "bge-small-en-v1.5" => (EmbeddingModel::BGESmallENV15, 384),
            "bge-base-en-v1.5" => (EmbeddingModel::BGEBaseENV15, 768),
            other => {
                return Err(EmbeddingError::Unavailable(format!(
                    "unsupported local model: {}",
                    other
                )))
            }
        };

        tracing::info!("Loading local embedding model {} ({}D)", model_name, dimension);

        let model = TextEmbedding::try_new(InitOptions::new(model).with_show_download_progress(false))
            .map_err(|e| EmbeddingError::Unavailable(e.to_string()))?;

        Ok(Self {
            model: Arc::new(model),
            model_name: model_name.to_string(),
            dimension,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for LocalModelProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let batch = texts.to_vec();

        let vectors = tokio::task::spawn_blocking(move || model.embed(batch, None))
            .await?
            .map_err(|e| EmbeddingError::Backend(e.to_string()))?;

        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: bad.len(),
            });
        }

        Ok(vectors)
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.dimension)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
