//! Integration tests for the OpenAI-compatible provider against a mock
//! HTTP server.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vecsql_embeddings::{EmbeddingError, EmbeddingProvider, EmbeddingRequest, OpenAiProvider};

fn embeddings_body(vector: &[f32]) -> serde_json::Value {
    json!({
        "object": "list",
        "data": [{ "object": "embedding", "index": 0, "embedding": vector }],
        "model": "text-embedding-3-small",
        "usage": { "prompt_tokens": 5, "total_tokens": 5 }
    })
}

#[tokio::test]
async fn embed_returns_vector_of_requested_length() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(embeddings_body(&[0.1, 0.2, 0.3])))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new()
        .with_api_key("sk-test")
        .with_base_url(server.uri());

    let response = provider
        .embed(EmbeddingRequest::new("hello world").with_dimensions(3))
        .await
        .unwrap();

    assert_eq!(response.embedding, vec![0.1, 0.2, 0.3]);
    assert_eq!(response.dimension, 3);
    assert_eq!(response.tokens_used, Some(5));
}

#[tokio::test]
async fn embed_fails_on_upstream_dimension_skew() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(embeddings_body(&[0.1, 0.2, 0.3])))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new()
        .with_api_key("sk-test")
        .with_base_url(server.uri());

    let err = provider
        .embed(EmbeddingRequest::new("hello world").with_dimensions(4))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EmbeddingError::DimensionMismatch {
            expected: 4,
            actual: 3
        }
    ));
}

#[tokio::test]
async fn embed_maps_429_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new()
        .with_api_key("sk-test")
        .with_base_url(server.uri());

    let err = provider
        .embed(EmbeddingRequest::new("hello"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EmbeddingError::RateLimited {
            retry_after_secs: 7
        }
    ));
}

#[tokio::test]
async fn embed_without_api_key_is_not_configured() {
    let provider = OpenAiProvider::new();
    let err = provider
        .embed(EmbeddingRequest::new("hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, EmbeddingError::ProviderNotConfigured));
}

#[tokio::test]
async fn embed_surfaces_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new()
        .with_api_key("sk-test")
        .with_base_url(server.uri());

    let err = provider
        .embed(EmbeddingRequest::new("hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, EmbeddingError::ApiRequest(_)));
}
