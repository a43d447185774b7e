//! Configuration for the product search Lambda.

use std::env;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";

/// Environment variable holding the upstream credential.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Prompting contract sent with every query.
pub const SYSTEM_INSTRUCTION: &str = r#"You are an expert e-commerce search assistant. Your job is to:
1.  **You MUST use the Google Search tool.** Your answer MUST be based *only* on the search results provided.
2.  **Do NOT use your internal knowledge.** If the search results are empty or irrelevant, just say "I could not find any specific products for that query."
3.  Generate a concise, 2-3 sentence conversational recommendation.
4.  Please try to name 2-3 specific product models in your answer (e.g., 'A great option is the Moto G54, or the Samsung F15'), but *only if you find them* in the search results.
5.  If you find them, briefly explain *why* they are good (e.g., 'The Moto has OIS, while the Samsung has a big battery').
6.  Do NOT use any markdown formatting (like '**').
7.  You must respond ONLY with the text of the recommendation. Do not include any other pre-amble or formatting."#;

/// Fixed settings for the upstream call, built once per process.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    /// Base URL of the generative language API
    pub api_base_url: String,
    /// Model name used in the `generateContent` path
    pub model: String,
    pub system_instruction: String,
    pub max_output_tokens: u32,
    pub temperature: f64,
    /// Upper bound on cited products returned to the frontend
    pub max_products: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            max_output_tokens: 2048,
            temperature: 0.2,
            max_products: 4,
        }
    }
}

impl SearchSettings {
    /// Load settings, applying optional environment overrides.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("GEMINI_API_BASE_URL").unwrap_or(defaults.api_base_url),
            model: env::var("GEMINI_MODEL").unwrap_or(defaults.model),
            ..defaults
        }
    }

    /// Full `generateContent` endpoint, without the credential.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Read the upstream credential. Empty values count as missing.
pub fn api_key_from_env() -> Option<String> {
    env::var(API_KEY_VAR).ok().filter(|key| !key.is_empty())
}
