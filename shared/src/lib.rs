//! Shared library for the product search Lambda.
//!
//! This crate provides the Gemini client, payload types and the request handling used by the
//! `search` Lambda binary.

pub mod config;
pub mod error;
pub mod gemini;
pub mod http;
pub mod models;
pub mod search;

pub use config::{api_key_from_env, SearchSettings};
pub use error::{Error, Result};
pub use gemini::{GeminiClient, GenerateRequest, GenerateResponse, GenerativeClient};
pub use models::{MessageResponse, Product, SearchRequest, SearchResponse};
pub use search::{handle_search, SearchReply};
