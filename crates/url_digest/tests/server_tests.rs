mod mocks;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use mocks::{completion::MockCompletion, text_source::MockTextSource};
use serde_json::{json, Value};
use tower::ServiceExt;
use url_digest::{
    server::{create_router, AppState},
    Analyzer,
};

fn router(source: MockTextSource, llm: MockCompletion) -> Router {
    create_router(AppState::new(Analyzer::new(source, llm)))
}

fn happy_router() -> Router {
    router(
        MockTextSource::new("page text"),
        MockCompletion::new(
            "a summary",
            json!({ "sentiment_score": 6, "sentiment_summary": "mostly good" }),
        ),
    )
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/summarise")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn test_missing_url_returns_400() {
    let response = happy_router()
        .oneshot(post_json(r#"{"strict": true}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "No URL provided" }));
}

#[tokio::test]
async fn test_empty_url_returns_400() {
    let response = happy_router()
        .oneshot(post_json(r#"{"url": ""}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "No URL provided" }));
}

#[tokio::test]
async fn test_unparsable_body_returns_400() {
    let response = happy_router()
        .oneshot(post_json("this is not json"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "No data provided" }));
}

#[tokio::test]
async fn test_successful_analysis_shape() {
    let response = happy_router()
        .oneshot(post_json(r#"{"url": "https://example.com/article"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["url"], "https://example.com/article");
    assert_eq!(body["summary"], "a summary");
    assert_eq!(body["sentiment"]["score"], 6);
    // corrected field name, not the original's misspelt one
    assert_eq!(body["sentiment"]["summary"], "mostly good");
}

#[tokio::test]
async fn test_prompt_overrides_are_forwarded() {
    let source = MockTextSource::new("page text");
    let llm = MockCompletion::new(
        "a summary",
        json!({ "sentiment_score": 6, "sentiment_summary": "fine" }),
    );
    let llm_calls = llm.calls.clone();

    let response = router(source, llm)
        .oneshot(post_json(
            r#"{"url": "https://example.com", "summary_prompt": "shorter please"}"#,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let calls = llm_calls.lock().unwrap();
    assert!(calls[0].messages[1].content.starts_with("shorter please :: "));
}

#[tokio::test]
async fn test_extraction_failure_maps_to_502() {
    let response = router(
        MockTextSource::failing("dns lookup failed"),
        MockCompletion::new("unused", json!({})),
    )
    .oneshot(post_json(r#"{"url": "https://example.com"}"#))
    .await
    .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert!(
        body["error"].as_str().expect("error string").contains("dns lookup failed"),
        "got: {body}"
    );
}

#[tokio::test]
async fn test_llm_failure_maps_to_500() {
    let response = router(
        MockTextSource::new("page text"),
        MockCompletion::failing("exhausted retries"),
    )
    .oneshot(post_json(r#"{"url": "https://example.com"}"#))
    .await
    .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().expect("error string").contains("exhausted retries"));
}
