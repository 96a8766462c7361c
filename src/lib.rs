//! # graphql-safe
//!
//! A response-safety layer for GraphQL clients: turns raw execution results
//! (data + top-level errors + in-band business `success` convention) into one
//! uniform, typed outcome so calling code never repeats error-classification
//! logic.
//!
//! ## Key Features
//!
//! - **Closed error taxonomy**: ten kinds, each with a guaranteed default
//!   message, resolved from server extension codes, message text, or
//!   network-level faults
//! - **Assert-or-fail responses**: declared required paths guarantee returned
//!   data is safe to destructure
//! - **Uniform outcomes**: transport, protocol, and business failures all
//!   land in the same [`SafeOutcome`] branch
//! - **Transport-agnostic**: any `execute` callable satisfying one trait
//!   plugs in; no client library types leak through
//!
//! ## Example
//!
//! ```rust,no_run
//! use graphql_safe::{safe_operation, GraphQLResponse, SafeOperationConfig};
//! use serde_json::json;
//!
//! # async fn example() {
//! let config = SafeOperationConfig::new()
//!     .payload_path("createWidget")
//!     .require_success();
//!
//! let outcome = safe_operation(
//!     |_config| async {
//!         // A real executor would run the mutation over its transport
//!         Ok(GraphQLResponse::with_data(json!({
//!             "createWidget": { "success": true, "id": "w1" }
//!         })))
//!     },
//!     &config,
//! )
//! .await;
//!
//! match outcome.into_result() {
//!     Ok(payload) => println!("created: {}", payload["id"]),
//!     Err(err) => println!("{}: {}", err.kind, err.message),
//! }
//! # }
//! ```

// Allow missing errors documentation - errors are self-documenting via type signatures
#![allow(clippy::missing_errors_doc)]

// Logging utilities (re-exports tracing with log_* naming) - internal only
pub(crate) mod logging;

pub mod adapter;
pub mod error;
pub mod normalize;
pub mod operation;
pub mod response;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use adapter::{derive_safe_outcome, Execute, OperationState, SafeMutation, SafeQuery};
pub use error::{
    friendly_message, is_auth_error, CanonicalError, ErrorKind, FriendlyMessages, SafeResult,
};
pub use normalize::{
    normalize_graphql_error, normalize_transport_error, resolve_error_kind, NormalizedError,
    TransportError,
};
pub use operation::{safe_operation, BoxError, SafeOperationConfig, SafeOutcome};
pub use response::{
    assert_graphql_response, format_path, walk_path, AssertOptions, ErrorLocation,
    GraphQLResponse, PathSegment,
};
