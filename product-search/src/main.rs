//! Search Lambda - Handles the product search endpoint.
//!
//! Forwards the user's query to Gemini with search grounding enabled and returns a short
//! recommendation plus the cited products.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::{api_key_from_env, handle_search, GeminiClient, SearchSettings};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state shared across requests.
struct AppState {
    settings: SearchSettings,
    gemini_client: GeminiClient,
}

impl AppState {
    fn new() -> Self {
        let settings = SearchSettings::from_env();
        let gemini_client = GeminiClient::new(reqwest::Client::new(), &settings);

        info!(model = %settings.model, "Search Lambda configured");

        Self {
            settings,
            gemini_client,
        }
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    // Credential is read on every invocation
    let api_key = api_key_from_env();

    handle_search(
        &state.settings,
        &state.gemini_client,
        api_key.as_deref(),
        event.body().as_ref(),
    )
    .await
    .into_response()
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new());

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
