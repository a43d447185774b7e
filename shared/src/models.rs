//! Request and response payloads exchanged with the frontend.

use serde::{Deserialize, Serialize};

/// Search request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub user_query: Option<String>,
}

/// A cited product taken from the grounding attributions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub uri: String,
    pub title: String,
}

/// Search response payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub recommendation_text: String,
    pub products: Vec<Product>,
}

/// Body returned on every non-success path.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
