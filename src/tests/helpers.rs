//! Test helper utilities for graphql-safe unit tests
//!
//! Reusable fixtures shared across test modules: raw GraphQL error objects,
//! transport error bundles, and canned responses.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use crate::normalize::TransportError;
use crate::response::GraphQLResponse;
use serde_json::{json, Value};

/// A raw GraphQL error object with a message and an extension code.
pub fn raw_error_with_code(message: &str, code: &str) -> Value {
    json!({
        "message": message,
        "extensions": { "code": code },
    })
}

/// A raw GraphQL error object with only a message.
pub fn raw_error(message: &str) -> Value {
    json!({ "message": message })
}

/// A fully populated raw GraphQL error object.
pub fn raw_error_full(message: &str, code: &str) -> Value {
    json!({
        "message": message,
        "path": ["createWidget", "owner", 0],
        "locations": [{ "line": 3, "column": 7 }],
        "extensions": { "code": code, "traceId": "t-123" },
    })
}

/// A transport error bundling the given raw GraphQL errors.
pub fn transport_with_errors(errors: Vec<Value>) -> TransportError {
    TransportError::graphql("Response not successful", errors)
}

/// A transport error representing a pure network-level failure.
pub fn transport_network_failure() -> TransportError {
    TransportError::network(
        "Failed to fetch",
        json!({ "name": "TypeError", "message": "Failed to fetch" }),
    )
}

/// A response with business payload data under the given field name.
pub fn success_response(field: &str, payload: Value) -> GraphQLResponse {
    GraphQLResponse::with_data(json!({ field: payload }))
}

/// A response carrying top-level errors alongside (possibly null) data.
pub fn error_response(data: Option<Value>, errors: Vec<Value>) -> GraphQLResponse {
    GraphQLResponse {
        data,
        errors: Some(errors),
        extensions: None,
    }
}
