// Inference API client tests against a mock server

use edubridge_search::services::embedding::{EmbeddingError, EmbeddingProvider, HttpEmbeddingProvider};
use std::time::Duration;

fn provider(url: &str, api_key: Option<&str>) -> HttpEmbeddingProvider {
    HttpEmbeddingProvider::new(
        &format!("{}/models/all-MiniLM-L6-v2", url),
        api_key.map(str::to_string),
        "all-MiniLM-L6-v2",
        Duration::from_secs(2),
    )
    .unwrap()
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_embeds_batch_with_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/models/all-MiniLM-L6-v2")
        .match_header("authorization", "Bearer hf_test")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "inputs": ["algebra", "Dr. Emily Brown Mathematics  New York, NY"]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[[0.1, 0.2, 0.3], [0.3, 0.2, 0.1]]")
        .create_async()
        .await;

    let vectors = provider(&server.url(), Some("hf_test"))
        .embed(&texts(&["algebra", "Dr. Emily Brown Mathematics  New York, NY"]))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors[1], vec![0.3, 0.2, 0.1]);
}

#[tokio::test]
async fn test_loading_model_maps_to_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/all-MiniLM-L6-v2")
        .with_status(503)
        .with_body(r#"{"error":"Model is currently loading"}"#)
        .create_async()
        .await;

    let result = provider(&server.url(), None).embed(&texts(&["physics"])).await;
    assert!(matches!(result, Err(EmbeddingError::Unavailable(_))));
}

#[tokio::test]
async fn test_rejected_key_maps_to_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/all-MiniLM-L6-v2")
        .with_status(401)
        .create_async()
        .await;

    let result = provider(&server.url(), Some("bad")).embed(&texts(&["physics"])).await;
    assert!(matches!(result, Err(EmbeddingError::Unauthorized)));
}

#[tokio::test]
async fn test_short_response_is_count_mismatch() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/all-MiniLM-L6-v2")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[[0.5, 0.5]]")
        .create_async()
        .await;

    let result = provider(&server.url(), None)
        .embed(&texts(&["spanish", "chemistry"]))
        .await;

    assert!(matches!(
        result,
        Err(EmbeddingError::CountMismatch { expected: 2, actual: 1 })
    ));
}

#[tokio::test]
async fn test_server_error_keeps_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/models/all-MiniLM-L6-v2")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let result = provider(&server.url(), None).embed(&texts(&["biology"])).await;
    match result {
        Err(EmbeddingError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected result: {:?}", other.map(|v| v.len())),
    }
}
