//! End-to-end search handling against an in-process mock of the Gemini API.
//!
//! Each test binds a mock upstream to a random local port, points `SearchSettings` at it and
//! drives `handle_search` with the real reqwest-backed `GeminiClient`.

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use shared::{handle_search, GeminiClient, SearchSettings};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

const QUERY: &str = r#"{"userQuery":"wireless earbuds for running"}"#;

/// A request as the mock upstream received it.
#[derive(Debug, Clone)]
struct Seen {
    uri: String,
    body: Value,
}

#[derive(Clone)]
struct MockUpstream {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Vec<Seen>>>,
}

async fn generate(
    State(upstream): State<MockUpstream>,
    uri: Uri,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    upstream.seen.lock().unwrap().push(Seen {
        uri: uri.to_string(),
        body,
    });
    (upstream.status, upstream.body.clone())
}

/// Start the mock and return settings aimed at it plus the request log.
async fn spawn_upstream(status: StatusCode, body: &str) -> (SearchSettings, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let upstream = MockUpstream {
        status,
        body: body.to_string(),
        seen: Arc::clone(&seen),
    };
    let app = Router::new()
        .route("/v1beta/models/{model}", post(generate))
        .with_state(upstream);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });

    let settings = SearchSettings {
        api_base_url: format!("http://{}/v1beta", addr),
        model: "test-model".to_string(),
        ..Default::default()
    };
    (settings, seen)
}

async fn search(settings: &SearchSettings, api_key: Option<&str>) -> anyhow::Result<(u16, Value)> {
    let client = GeminiClient::new(reqwest::Client::new(), settings);
    let reply = handle_search(settings, &client, api_key, QUERY.as_bytes()).await;
    Ok((reply.status, serde_json::from_str(&reply.body)?))
}

#[tokio::test]
async fn grounded_answer_is_reshaped() -> anyhow::Result<()> {
    let upstream_body = json!({
        "candidates": [{
            "finishReason": "STOP",
            "content": { "role": "model", "parts": [{ "text": "Recommendation X." }] },
            "groundingMetadata": {
                "groundingAttributions": [
                    { "web": { "uri": "https://a.example", "title": "Earbuds A" } },
                    { "web": { "uri": "https://b.example", "title": "Earbuds B" } },
                    { "web": { "uri": "https://c.example" } }
                ]
            }
        }]
    });
    let (settings, seen) = spawn_upstream(StatusCode::OK, &upstream_body.to_string()).await;

    let (status, body) = search(&settings, Some("test-key")).await?;
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "recommendationText": "Recommendation X.",
            "products": [
                { "uri": "https://a.example", "title": "Earbuds A" },
                { "uri": "https://b.example", "title": "Earbuds B" },
            ],
        })
    );

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].uri, "/v1beta/models/test-model:generateContent?key=test-key");
    assert_eq!(
        seen[0].body["contents"][0]["parts"][0]["text"],
        "User's e-commerce query: \"wireless earbuds for running\""
    );
    assert_eq!(seen[0].body["tools"], json!([{ "google_search": {} }]));
    assert_eq!(
        seen[0].body["generationConfig"],
        json!({ "maxOutputTokens": 2048, "temperature": 0.2 })
    );
    Ok(())
}

#[tokio::test]
async fn upstream_error_status_is_relayed() -> anyhow::Result<()> {
    let error_body = json!({ "error": { "code": 429, "message": "rate limited" } });
    let (settings, _) = spawn_upstream(StatusCode::TOO_MANY_REQUESTS, &error_body.to_string()).await;

    let (status, body) = search(&settings, Some("test-key")).await?;
    assert_eq!(status, 429);
    assert_eq!(body, json!({ "message": "API Error: rate limited" }));
    Ok(())
}

#[tokio::test]
async fn unreadable_error_body_is_generic_failure() -> anyhow::Result<()> {
    let (settings, _) = spawn_upstream(StatusCode::BAD_GATEWAY, "<html>upstream down</html>").await;

    let (status, body) = search(&settings, Some("test-key")).await?;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "message": "An error occurred on the server." }));
    Ok(())
}

#[tokio::test]
async fn malformed_success_body_is_generic_failure() -> anyhow::Result<()> {
    let (settings, _) = spawn_upstream(StatusCode::OK, "{ not json").await;

    let (status, body) = search(&settings, Some("test-key")).await?;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "message": "An error occurred on the server." }));
    Ok(())
}

#[tokio::test]
async fn missing_key_never_reaches_upstream() -> anyhow::Result<()> {
    let (settings, seen) = spawn_upstream(StatusCode::OK, "{}").await;

    let (status, body) = search(&settings, None).await?;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "message": "Server is missing API key configuration." }));
    assert!(seen.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn connection_refused_is_generic_failure() -> anyhow::Result<()> {
    // Grab a free port, then release it so nothing is listening there
    let addr = std::net::TcpListener::bind("127.0.0.1:0")?.local_addr()?;
    let settings = SearchSettings {
        api_base_url: format!("http://{}/v1beta", addr),
        ..Default::default()
    };

    let (status, body) = search(&settings, Some("test-key")).await?;
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "message": "An error occurred on the server." }));
    Ok(())
}
