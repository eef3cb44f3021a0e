use async_trait::async_trait;
use std::sync::Arc;

use super::{EmbeddingError, EmbeddingProvider};

/// Single-flight gate for backends that cannot run inference concurrently
///
/// Requests queue on an async mutex; at most one batch is inside the inner
/// provider at any time.
pub struct SerializedProvider {
    inner: Arc<dyn EmbeddingProvider>,
    gate: tokio::sync::Mutex<()>,
}

impl SerializedProvider {
    pub fn new(inner: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            inner,
            gate: tokio::sync::Mutex::new(()),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for SerializedProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let _guard = self.gate.lock().await;
        self.inner.embed(texts).await
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
