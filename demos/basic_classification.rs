//! Basic classification example: raw GraphQL errors in, canonical kinds out.
//!
//! This example shows how to:
//! - Normalize raw GraphQL error objects
//! - Resolve a canonical kind from codes, messages, and network faults
//! - Read the guaranteed default message per kind
//!
//! # Running
//!
//! ```bash
//! cargo run --example basic_classification
//! ```

use graphql_safe::{
    normalize_graphql_error, normalize_transport_error, resolve_error_kind, ErrorKind,
    TransportError,
};
use serde_json::json;

fn main() {
    println!("=== Extension codes win over message text ===\n");

    let raw = json!({
        "message": "this message claims a validation problem",
        "extensions": { "code": "FORBIDDEN" },
    });
    let normalized = normalize_graphql_error(&raw);
    let kind = resolve_error_kind(None, std::slice::from_ref(&normalized));
    println!("code FORBIDDEN  -> {kind}: {}", kind.default_message());

    println!("\n=== Message sniffing covers code-less backends ===\n");

    let raw = json!({ "message": "Authentication required to view this" });
    let normalized = normalize_graphql_error(&raw);
    let kind = resolve_error_kind(None, std::slice::from_ref(&normalized));
    println!("no code        -> {kind}: {}", kind.default_message());

    println!("\n=== Network faults are their own kind ===\n");

    let transport = TransportError::network(
        "Failed to fetch",
        json!({ "name": "TypeError", "message": "Failed to fetch" }),
    );
    let canonical = normalize_transport_error(&transport);
    println!(
        "network fault  -> {}: {} (details: {})",
        canonical.kind,
        canonical.message,
        canonical.details.unwrap_or(json!(null)),
    );

    println!("\n=== Every kind has a default message ===\n");
    for kind in ErrorKind::ALL {
        println!("{kind:<24} {}", kind.default_message());
    }
}
