//! Error handling example demonstrating the canonical taxonomy end to end.
//!
//! This example shows how to:
//! - Branch on a SafeOutcome instead of exception-style handling
//! - Detect auth failures for sign-in routing
//! - Inspect preserved original errors for diagnostics
//!
//! # Running
//!
//! ```bash
//! cargo run --example error_handling
//! ```

use graphql_safe::{
    friendly_message, is_auth_error, safe_operation, BoxError, GraphQLResponse,
    SafeOperationConfig, TransportError,
};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SafeOperationConfig::new();

    // A transport bundle with several protocol errors: only one message
    // surfaces, all originals survive for logging
    let outcome = safe_operation(
        |_| async {
            Err::<GraphQLResponse, BoxError>(
                TransportError::graphql(
                    "Response not successful",
                    vec![
                        json!({ "message": "Unauthenticated", "extensions": { "code": "UNAUTHENTICATED" } }),
                        json!({ "message": "Secondary failure" }),
                    ],
                )
                .into(),
            )
        },
        &config,
    )
    .await;

    if let Err(err) = outcome.into_result() {
        println!("kind:     {}", err.kind);
        println!("message:  {}", err.message);
        println!("friendly: {}", friendly_message(&err));
        println!("is auth:  {}", is_auth_error(&err));
        println!("original errors preserved: {}", err.original_errors.len());
        for (i, original) in err.original_errors.iter().enumerate() {
            println!("  [{i}] {} (code {:?})", original.message, original.code);
        }
    }

    // A plain executor error never escapes as a panic or rejection
    let outcome = safe_operation(
        |_| async {
            Err::<GraphQLResponse, BoxError>("socket closed unexpectedly".into())
        },
        &config,
    )
    .await;
    if let Err(err) = outcome.into_result() {
        println!("\nplain error downgraded -> {}: {}", err.kind, err.message);
    }

    Ok(())
}
