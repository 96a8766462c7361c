//! Test helper utilities for graphql-safe integration tests
//!
//! Provides a closure-backed executor so end-to-end tests can script any
//! transport behavior without a real GraphQL backend.

// Allow dead code in test utilities - functions are used across different test files
#![allow(dead_code)]

use async_trait::async_trait;
use graphql_safe::{BoxError, Execute, GraphQLResponse, SafeOperationConfig};

/// An executor backed by a plain closure.
pub struct ScriptedExecutor<F>(pub F);

#[async_trait]
impl<F> Execute for ScriptedExecutor<F>
where
    F: Fn(SafeOperationConfig) -> Result<GraphQLResponse, BoxError> + Send + Sync,
{
    async fn execute(&self, config: SafeOperationConfig) -> Result<GraphQLResponse, BoxError> {
        (self.0)(config)
    }
}
