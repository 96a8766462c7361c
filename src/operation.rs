//! The safe operation wrapper: one execution, one uniform outcome.
//!
//! [`safe_operation`] orchestrates the normalizer and the response assertion
//! around a single caller-supplied execute call, so UI code branches on one
//! [`SafeOutcome`] instead of repeating error classification per call site.
//! Its contract is "always resolves": the future never panics on bad input
//! and every failure path lands in `SafeOutcome::Failure`.

use crate::error::{CanonicalError, ErrorKind, FriendlyMessages, SafeResult};
use crate::logging::{log_debug, log_warn};
use crate::normalize::{normalize_transport_error, TransportError};
use crate::response::{assert_graphql_response, walk_path, AssertOptions, GraphQLResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use uuid::Uuid;

/// Any error an executor can produce. Transport bundles travel as
/// [`TransportError`]; everything else is downgraded to `Unknown`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The uniform discriminated outcome of a safe operation.
///
/// This is the only type calling UI code should inspect: exactly one of
/// `payload`/`error` is meaningful per branch.
#[derive(Debug, Clone)]
pub enum SafeOutcome {
    /// The operation succeeded; `payload` is the extracted business payload
    /// (or the whole data when no payload path was configured).
    Success {
        /// Extracted payload, safe to destructure.
        payload: Value,
    },
    /// The operation failed at any level (network, protocol, business).
    Failure {
        /// Classified error with a UI-ready message.
        error: CanonicalError,
    },
}

impl SafeOutcome {
    /// Whether this outcome is a success.
    pub fn ok(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The payload, when successful.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Success { payload } => Some(payload),
            Self::Failure { .. } => None,
        }
    }

    /// The classified error, when failed.
    pub fn error(&self) -> Option<&CanonicalError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// Convert into a standard `Result` for `?`-style call sites.
    pub fn into_result(self) -> SafeResult<Value> {
        match self {
            Self::Success { payload } => Ok(payload),
            Self::Failure { error } => Err(error),
        }
    }

    fn failure(error: CanonicalError) -> Self {
        Self::Failure { error }
    }
}

/// Configuration for a safe operation. All fields are optional; absence
/// means "skip that behavior."
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SafeOperationConfig {
    /// Dot-path into the response data addressing the business payload
    /// (e.g. `"createWidget"`). Registered as a required path during
    /// assertion, so extraction afterwards cannot come up empty.
    pub payload_path: Option<String>,
    /// Enforce the in-band business convention: a payload with an explicit
    /// `success: false` is a failure. A payload without the flag is not.
    pub require_success: bool,
    /// Per-kind message overrides, applied last on every failure path.
    pub friendly_messages: FriendlyMessages,
    /// Operation variables, passed through to the executor opaquely.
    pub variables: Option<Value>,
}

impl SafeOperationConfig {
    /// Empty configuration: no extraction, no success enforcement.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payload extraction path.
    #[must_use]
    pub fn payload_path(mut self, path: impl Into<String>) -> Self {
        self.payload_path = Some(path.into());
        self
    }

    /// Enforce the business-level success flag.
    #[must_use]
    pub fn require_success(mut self) -> Self {
        self.require_success = true;
        self
    }

    /// Add a per-kind message override.
    #[must_use]
    pub fn friendly_message(mut self, kind: ErrorKind, message: impl Into<String>) -> Self {
        self.friendly_messages.insert(kind, message.into());
        self
    }

    /// Attach operation variables for the executor.
    #[must_use]
    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Merge a per-call override config over this one. Per-call fields win on
    /// conflict; `require_success`, having no unset state, combines with OR.
    #[must_use]
    pub fn merged(&self, overrides: Self) -> Self {
        let mut friendly_messages = self.friendly_messages.clone();
        friendly_messages.extend(overrides.friendly_messages);
        Self {
            payload_path: overrides.payload_path.or_else(|| self.payload_path.clone()),
            require_success: self.require_success || overrides.require_success,
            friendly_messages,
            variables: overrides.variables.or_else(|| self.variables.clone()),
        }
    }

    /// Reject structurally invalid configurations (payload paths with empty
    /// segments, which could never resolve).
    pub fn validate(&self) -> SafeResult<()> {
        if let Some(path) = &self.payload_path {
            if path.is_empty() || path.split('.').any(str::is_empty) {
                return Err(CanonicalError::unknown(format!(
                    "Invalid payload path: {path:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Run one query/mutation through the full safety pipeline.
///
/// `execute` is invoked exactly once; the wrapper performs no retries and has
/// no side effects beyond that single invocation. The returned outcome is:
/// - `Success` with the payload addressed by `payload_path` (the whole data
///   when no path is configured), or
/// - `Failure` with a classified [`CanonicalError`] for transport failures,
///   top-level GraphQL errors, missing data/paths, and business-level
///   `success: false` payloads alike.
///
/// Any error the executor produces is classified rather than propagated:
/// transport bundles via the transport normalizer, already-canonical errors
/// as-is, anything else as `Unknown`.
pub async fn safe_operation<F, Fut>(execute: F, config: &SafeOperationConfig) -> SafeOutcome
where
    F: FnOnce(SafeOperationConfig) -> Fut,
    Fut: Future<Output = Result<GraphQLResponse, BoxError>>,
{
    let operation_id = Uuid::new_v4();
    log_debug!(
        operation_id = %operation_id,
        payload_path = ?config.payload_path,
        require_success = config.require_success,
        "Executing safe operation"
    );

    let response = match execute(config.clone()).await {
        Ok(response) => response,
        Err(err) => {
            let error = classify_caught(err, &config.friendly_messages);
            log_warn!(
                operation_id = %operation_id,
                kind = %error.kind,
                "Safe operation failed during execution"
            );
            return SafeOutcome::failure(error);
        }
    };

    match settle_response(response, config) {
        Ok(payload) => {
            log_debug!(operation_id = %operation_id, "Safe operation succeeded");
            SafeOutcome::Success { payload }
        }
        Err(error) => {
            log_warn!(
                operation_id = %operation_id,
                kind = %error.kind,
                "Safe operation failed after execution"
            );
            SafeOutcome::failure(error)
        }
    }
}

/// The post-execution pipeline: assert the response, extract the payload by
/// dot-path, and enforce the business success flag when configured.
///
/// Shared by [`safe_operation`] and the state-driven continuous adapter.
pub(crate) fn settle_response(
    response: GraphQLResponse,
    config: &SafeOperationConfig,
) -> SafeResult<Value> {
    let options = AssertOptions {
        required_paths: config
            .payload_path
            .as_ref()
            .map(|path| vec![format!("data.{path}")])
            .unwrap_or_default(),
        friendly_messages: config.friendly_messages.clone(),
    };

    let data = assert_graphql_response(response, &options)?;

    let payload = match &config.payload_path {
        Some(path) => match walk_path(&data, path) {
            Some(payload) => payload.clone(),
            // Unreachable after assertion, but downgrade rather than panic
            None => {
                return Err(CanonicalError::of_kind(ErrorKind::Unknown)
                    .with_details(json!({ "path": path }))
                    .with_friendly_override(&config.friendly_messages));
            }
        },
        None => data,
    };

    if config.require_success {
        if let Some(error) = business_failure(&payload, &config.friendly_messages) {
            return Err(error);
        }
    }

    Ok(payload)
}

/// Detect the in-band business failure convention on an extracted payload.
///
/// Only a strict `success: false` triggers this branch; a payload that omits
/// the flag entirely passes. Some operations' payloads legitimately never
/// carry it.
pub(crate) fn business_failure(
    payload: &Value,
    friendly_messages: &FriendlyMessages,
) -> Option<CanonicalError> {
    if payload.get("success") != Some(&Value::Bool(false)) {
        return None;
    }

    let payload_message = payload.get("message").and_then(Value::as_str).unwrap_or("");
    let lowered = payload_message.to_lowercase();
    // The payload convention carries no structured code, so the message text
    // is the only signal separating an expired session from bad input
    let kind = if lowered.contains("not authenticated") || lowered.contains("authentication required")
    {
        ErrorKind::AuthenticationRequired
    } else {
        ErrorKind::ValidationError
    };

    Some(
        CanonicalError::new(kind, payload_message)
            .with_details(json!({
                "fieldErrors": payload.get("errors").cloned().unwrap_or(Value::Null),
                "raw": payload,
            }))
            .with_friendly_override(friendly_messages),
    )
}

/// Classify an error the executor produced.
pub(crate) fn classify_caught(err: BoxError, friendly_messages: &FriendlyMessages) -> CanonicalError {
    let err = match err.downcast::<TransportError>() {
        Ok(transport) => {
            return normalize_transport_error(&transport).with_friendly_override(friendly_messages);
        }
        Err(err) => err,
    };
    match err.downcast::<CanonicalError>() {
        Ok(canonical) => canonical.with_friendly_override(friendly_messages),
        Err(other) => {
            CanonicalError::unknown(other.to_string()).with_friendly_override(friendly_messages)
        }
    }
}
