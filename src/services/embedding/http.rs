use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

use super::{EmbeddingError, EmbeddingProvider};

/// Remote inference backend client
///
/// Speaks the Hugging Face feature-extraction protocol: a JSON body
/// `{"inputs": [...]}` answered with one vector per input.
pub struct HttpEmbeddingProvider {
    endpoint: String,
    api_key: Option<String>,
    model_name: String,
    client: Client,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a [String],
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

impl HttpEmbeddingProvider {
    /// Create a new client for the given endpoint
    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        model_name: &str,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            model_name: model_name.to_string(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = InferenceRequest {
            inputs: texts,
            options: InferenceOptions { wait_for_model: true },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!("Requesting {} embeddings from {}", texts.len(), self.endpoint);

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(EmbeddingError::Unauthorized);
        }

        if status == StatusCode::SERVICE_UNAVAILABLE {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Unavailable(format!("model not ready: {}", body)));
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Inference API error: {} - {}", status, body);
            return Err(EmbeddingError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let vectors: Vec<Vec<f32>> = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(format!("Failed to parse embeddings: {}", e)))?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }

        Ok(vectors)
    }

    fn dimension(&self) -> Option<usize> {
        None
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
