//! Embedding providers.
//!
//! The real provider speaks the OpenAI embeddings wire format; the mock
//! provider never touches the network.

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};

/// Request for generating an embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Text to embed.
    pub text: String,

    /// Model to use (provider-specific).
    pub model: Option<String>,

    /// Dimensions for the output; falls back to the provider default.
    pub dimensions: Option<usize>,
}

impl EmbeddingRequest {
    /// Create a new embedding request.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            dimensions: None,
        }
    }

    /// Set the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the output dimensions.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }
}

/// Response from embedding generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// The generated embedding.
    pub embedding: Embedding,

    /// Model used to generate the embedding.
    pub model: String,

    /// Dimension of the embedding.
    pub dimension: usize,

    /// Token usage (if reported by the provider).
    pub tokens_used: Option<u64>,
}

/// Trait for embedding providers.
///
/// Implementations guarantee that a returned embedding has exactly the
/// requested length; a provider that cannot honor the requested
/// dimensionality fails with [`EmbeddingError::DimensionMismatch`] rather
/// than truncating or padding.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Get the name of this provider.
    fn name(&self) -> &str;

    /// Get the default embedding dimension.
    fn default_dimension(&self) -> usize;

    /// Generate an embedding for the given text.
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse>;

    /// Generate embeddings for multiple texts, one call per text.
    async fn embed_batch(&self, requests: Vec<EmbeddingRequest>) -> Result<Vec<EmbeddingResponse>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.embed(request).await?);
        }
        Ok(results)
    }

    /// Check if the provider is usable (API key set, etc.).
    fn is_available(&self) -> bool;
}

/// Provider for OpenAI-compatible embedding APIs.
///
/// Works against api.openai.com as well as Azure OpenAI deployments when
/// pointed at the deployment's base URL. One network call per `embed`
/// invocation; failures propagate without retry.
pub struct OpenAiProvider {
    /// API key; `None` leaves the provider unavailable.
    api_key: Option<String>,

    /// API base URL.
    base_url: String,

    /// HTTP client.
    client: reqwest::Client,

    /// Default model (or Azure deployment name).
    model: String,
}

impl OpenAiProvider {
    /// Create a provider with no credentials configured.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
            model: "text-embedding-3-small".to_string(),
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default model or deployment name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for OpenAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn default_dimension(&self) -> usize {
        match self.model.as_str() {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        }
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or(EmbeddingError::ProviderNotConfigured)?;

        if request.text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let model = request.model.unwrap_or_else(|| self.model.clone());
        let dimensions = request.dimensions.unwrap_or_else(|| self.default_dimension());

        debug!("Generating embedding with model: {model}");

        let body = serde_json::json!({
            "input": request.text,
            "model": model,
            "dimensions": dimensions,
        });

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(EmbeddingError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ApiRequest(format!(
                "API error: {error_text}"
            )));
        }

        let result: OpenAiEmbeddingResponse = response.json().await?;

        let embedding = result
            .data
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse("No embedding in response".to_string()))?
            .embedding;

        // The upstream length must match exactly; a skewed vector is a hard
        // error, never silently truncated or padded.
        if embedding.len() != dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dimensions,
                actual: embedding.len(),
            });
        }

        let tokens_used = result.usage.map(|u| u.total_tokens);

        info!("Generated embedding with {dimensions} dimensions");

        Ok(EmbeddingResponse {
            embedding,
            model: result.model,
            dimension: dimensions,
            tokens_used,
        })
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }
}

/// OpenAI API response format.
#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
    model: String,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    total_tokens: u64,
}

/// Offline embedding provider for tests and demos.
///
/// Returns uniform-random floats in `[0, 1)` of the requested length, or a
/// caller-supplied fixed vector. Never touches the network, and is only ever
/// selected explicitly by the caller.
pub struct MockProvider {
    dimension: usize,
    fixed: Option<Embedding>,
}

impl MockProvider {
    /// Create a mock provider producing random vectors of `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            fixed: None,
        }
    }

    /// Create a mock provider that always returns `vector`.
    pub fn fixed(vector: Embedding) -> Self {
        Self {
            dimension: vector.len(),
            fixed: Some(vector),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        if request.text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let dimensions = request.dimensions.unwrap_or(self.dimension);

        let embedding = match &self.fixed {
            Some(vector) => {
                if vector.len() != dimensions {
                    return Err(EmbeddingError::DimensionMismatch {
                        expected: dimensions,
                        actual: vector.len(),
                    });
                }
                vector.clone()
            }
            None => {
                let mut rng = rand::rng();
                (0..dimensions).map(|_| rng.random::<f32>()).collect()
            }
        };

        Ok(EmbeddingResponse {
            embedding,
            model: "mock".to_string(),
            dimension: dimensions,
            tokens_used: None,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}
