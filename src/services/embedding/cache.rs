use async_trait::async_trait;
use std::sync::Arc;

use super::{validate_batch, EmbeddingError, EmbeddingProvider};

/// Memoizing embedding decorator
///
/// Keys on the exact text, so a hit returns the same vector the inner
/// provider produced for that text and ranking results never change.
/// Misses from one call are embedded together in a single inner batch.
pub struct CachedProvider {
    inner: Arc<dyn EmbeddingProvider>,
    cache: moka::future::Cache<String, Arc<Vec<f32>>>,
}

impl CachedProvider {
    pub fn new(inner: Arc<dyn EmbeddingProvider>, max_entries: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(max_entries).build();
        Self { inner, cache }
    }
}

#[async_trait]
impl EmbeddingProvider for CachedProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut results: Vec<Option<Vec<f32>>> = Vec::with_capacity(texts.len());
        let mut misses: Vec<usize> = Vec::new();

        for (idx, text) in texts.iter().enumerate() {
            match self.cache.get(text).await {
                Some(vector) => results.push(Some(vector.as_ref().clone())),
                None => {
                    results.push(None);
                    misses.push(idx);
                }
            }
        }

        tracing::trace!("Embedding cache: {} hits, {} misses", texts.len() - misses.len(), misses.len());

        if !misses.is_empty() {
            let miss_texts: Vec<String> = misses.iter().map(|&i| texts[i].clone()).collect();
            let fresh = self.inner.embed(&miss_texts).await?;

            // malformed batches are never cached
            validate_batch(miss_texts.len(), self.inner.dimension(), &fresh)?;

            for (idx, vector) in misses.into_iter().zip(fresh) {
                self.cache
                    .insert(texts[idx].clone(), Arc::new(vector.clone()))
                    .await;
                results[idx] = Some(vector);
            }
        }

        // every slot was either a hit or filled from the inner batch
        Ok(results.into_iter().flatten().collect())
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how many texts reach the backend
    struct CountingProvider {
        calls: AtomicUsize,
        texts: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingProvider {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.texts.fetch_add(texts.len(), Ordering::SeqCst);
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }

        fn dimension(&self) -> Option<usize> {
            Some(2)
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let inner = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
        });
        let cached = CachedProvider::new(inner.clone(), 100);

        let texts = vec!["ab".to_string(), "abcd".to_string()];
        let first = cached.embed(&texts).await.unwrap();
        let second = cached.embed(&texts).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_only_misses_reach_backend_in_order() {
        let inner = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
            texts: AtomicUsize::new(0),
        });
        let cached = CachedProvider::new(inner.clone(), 100);

        cached.embed(&["b".to_string()]).await.unwrap();
        let texts = vec!["aaa".to_string(), "b".to_string(), "cc".to_string()];
        let vectors = cached.embed(&texts).await.unwrap();

        assert_eq!(vectors, vec![vec![3.0, 1.0], vec![1.0, 1.0], vec![2.0, 1.0]]);
        assert_eq!(inner.texts.load(Ordering::SeqCst), 3);
        assert_eq!(cached.name(), "counting");
    }

    /// Returns ragged vectors on its first call, well-formed ones after
    struct RaggedOnceProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for RaggedOnceProvider {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .enumerate()
                .map(|(i, _)| if call == 0 && i == 1 { vec![1.0] } else { vec![1.0, 0.0] })
                .collect())
        }

        fn dimension(&self) -> Option<usize> {
            None
        }

        fn name(&self) -> &str {
            "ragged-once"
        }
    }

    #[tokio::test]
    async fn test_malformed_batch_not_cached() {
        let inner = Arc::new(RaggedOnceProvider { calls: AtomicUsize::new(0) });
        let cached = CachedProvider::new(inner.clone(), 100);
        let texts = vec!["Physics".to_string(), "Chemistry".to_string()];

        let first = cached.embed(&texts).await;
        assert!(matches!(first, Err(EmbeddingError::DimensionMismatch { .. })));

        let second = cached.embed(&texts).await.unwrap();
        assert_eq!(second, vec![vec![1.0, 0.0], vec![1.0, 0.0]]);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
