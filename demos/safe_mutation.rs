//! Safe mutation example: one executor call, one uniform outcome.
//!
//! This example shows how to:
//! - Wire an executor into the safe operation wrapper
//! - Extract a business payload by dot-path
//! - Enforce the in-band `success` convention
//!
//! # Running
//!
//! ```bash
//! cargo run --example safe_mutation
//! ```

use graphql_safe::{safe_operation, ErrorKind, GraphQLResponse, SafeOperationConfig};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SafeOperationConfig::new()
        .payload_path("createWidget")
        .require_success()
        .friendly_message(ErrorKind::ValidationError, "Please check your input");

    // A real executor would run the mutation over an HTTP transport; this
    // one scripts a backend that accepts the first widget and rejects the
    // second by name collision.
    for name in ["alpha", "alpha again"] {
        let outcome = safe_operation(
            |cfg| async move {
                let requested = cfg
                    .variables
                    .as_ref()
                    .and_then(|v| v.get("name"))
                    .cloned()
                    .unwrap_or(json!("alpha"));
                if requested == json!("alpha") {
                    Ok(GraphQLResponse::with_data(json!({
                        "createWidget": { "success": true, "id": "w1", "name": requested }
                    })))
                } else {
                    Ok(GraphQLResponse::with_data(json!({
                        "createWidget": {
                            "success": false,
                            "message": "Name taken",
                            "errors": [{ "field": "name", "message": "already in use" }],
                        }
                    })))
                }
            },
            &config.clone().variables(json!({ "name": name })),
        )
        .await;

        match outcome.into_result() {
            Ok(payload) => println!("created widget {} as {}", payload["id"], payload["name"]),
            Err(err) => println!("{}: {} (kind {})", name, err.message, err.kind),
        }
    }

    Ok(())
}
