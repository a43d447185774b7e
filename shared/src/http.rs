//! HTTP helpers for Lambda functions.

use lambda_http::{Body, Response};

use crate::search::SearchReply;

/// Create a JSON response with the given status code and serialized body.
pub fn json_response(status: u16, body: String) -> Result<Response<Body>, lambda_http::Error> {
    Ok(Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .map_err(Box::new)?)
}

impl SearchReply {
    pub fn into_response(self) -> Result<Response<Body>, lambda_http::Error> {
        json_response(self.status, self.body)
    }
}
