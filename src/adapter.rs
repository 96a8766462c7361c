//! Reactive adapters over the safe operation pipeline.
//!
//! Two bindings mirror the two ways UI code consumes GraphQL operations:
//!
//! - [`SafeMutation`]: one-shot, call-driven. Each `invoke` runs the executor
//!   once and resolves a [`SafeOutcome`]; the raw transport snapshot stays
//!   observable unshadowed alongside it.
//! - [`SafeQuery`]: continuous, state-driven. The hosting layer feeds it the
//!   latest `{loading, data, error}` snapshot and gets back a memoized
//!   outcome; derivation is the pure [`derive_safe_outcome`], independent of
//!   any particular reactive framework.

use crate::error::{CanonicalError, ErrorKind, SafeResult};
use crate::logging::log_debug;
use crate::normalize::{normalize_transport_error, TransportError};
use crate::operation::{safe_operation, settle_response, BoxError, SafeOperationConfig, SafeOutcome};
use crate::response::GraphQLResponse;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

/// The single required integration point with a GraphQL transport.
///
/// Anything that can run one query/mutation and produce a raw result (an
/// HTTP client binding, a test double) satisfies this trait. Errors travel
/// as [`BoxError`]; transports should surface their failures as
/// [`TransportError`] so classification can see bundled GraphQL errors and
/// network faults.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Execute: Send + Sync {
    /// Run the operation once with the merged configuration.
    async fn execute(&self, config: SafeOperationConfig) -> Result<GraphQLResponse, BoxError>;
}

/// Snapshot of the underlying transport state for one operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationState {
    /// An execution is in flight.
    pub loading: bool,
    /// Latest data the transport produced, if any.
    pub data: Option<Value>,
    /// Latest transport-level error, if any.
    pub error: Option<TransportError>,
}

// ============================================================================
// One-shot adapter
// ============================================================================

/// One-shot (mutation-style) binding around an executor.
///
/// Holds a default configuration; each [`invoke`](Self::invoke) merges
/// per-call overrides over it (per-call wins) and runs the pipeline once.
/// Concurrent invokes are independent; the adapter imposes no ordering or
/// de-duplication.
pub struct SafeMutation {
    executor: Arc<dyn Execute>,
    defaults: SafeOperationConfig,
    state: Mutex<OperationState>,
}

impl SafeMutation {
    /// Create the binding, validating the default configuration.
    pub fn new(executor: Arc<dyn Execute>, defaults: SafeOperationConfig) -> SafeResult<Self> {
        defaults.validate()?;
        Ok(Self {
            executor,
            defaults,
            state: Mutex::new(OperationState::default()),
        })
    }

    /// Invoke the operation once with per-call overrides.
    ///
    /// Always resolves to a [`SafeOutcome`]; executor failures and malformed
    /// responses come back classified, never as panics.
    pub async fn invoke(&self, overrides: SafeOperationConfig) -> SafeOutcome {
        let config = self.defaults.merged(overrides);
        self.update_state(|state| state.loading = true);

        // The one and only execution for this invoke
        let raw = self.executor.execute(config.clone()).await;

        match raw {
            Ok(response) => {
                self.update_state(|state| {
                    state.loading = false;
                    state.data = response.data.clone();
                    state.error = response
                        .has_errors()
                        .then(|| TransportError::graphql(
                            String::new(),
                            response.errors.clone().unwrap_or_default(),
                        ));
                });
                safe_operation(|_| async move { Ok(response) }, &config).await
            }
            Err(err) => {
                let snapshot = err
                    .downcast_ref::<TransportError>()
                    .cloned()
                    .unwrap_or_else(|| TransportError::new(err.to_string()));
                self.update_state(|state| {
                    state.loading = false;
                    state.data = None;
                    state.error = Some(snapshot);
                });
                safe_operation(|_| async move { Err(err) }, &config).await
            }
        }
    }

    /// Latest raw transport snapshot, unshadowed by derived state.
    pub fn state(&self) -> OperationState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn update_state(&self, apply: impl FnOnce(&mut OperationState)) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state);
    }
}

// ============================================================================
// Continuous adapter
// ============================================================================

/// Derive a safe outcome from the latest transport snapshot.
///
/// Pure and synchronous; never triggers a fetch. Returns `None` while
/// loading, so a stale outcome is never shown during refetch. Once settled:
/// - data present: run the same assertion + extraction + success-flag logic
///   as the one-shot pipeline, but on failure prefer normalizing a
///   coexisting transport error over the local assertion error;
/// - only an error present: normalize it directly;
/// - neither present: a default `Unknown` failure.
pub fn derive_safe_outcome(
    state: &OperationState,
    config: &SafeOperationConfig,
) -> Option<SafeOutcome> {
    if state.loading {
        return None;
    }

    let outcome = match (&state.data, &state.error) {
        (Some(data), _) if !data.is_null() => {
            match settle_response(GraphQLResponse::with_data(data.clone()), config) {
                Ok(payload) => SafeOutcome::Success { payload },
                Err(local) => {
                    let error = match &state.error {
                        Some(transport) => normalize_transport_error(transport)
                            .with_friendly_override(&config.friendly_messages),
                        None => local,
                    };
                    SafeOutcome::Failure { error }
                }
            }
        }
        (_, Some(transport)) => SafeOutcome::Failure {
            error: normalize_transport_error(transport)
                .with_friendly_override(&config.friendly_messages),
        },
        _ => SafeOutcome::Failure {
            error: CanonicalError::of_kind(ErrorKind::Unknown)
                .with_friendly_override(&config.friendly_messages),
        },
    };

    Some(outcome)
}

/// Continuous (query-style) binding: memoized [`derive_safe_outcome`].
///
/// The memo is scoped to one instance and keyed on the last observed
/// snapshot, so repeated observations of an unchanged state cost one
/// comparison instead of a re-derivation.
pub struct SafeQuery {
    config: SafeOperationConfig,
    memo: Mutex<Option<(OperationState, Option<SafeOutcome>)>>,
}

impl SafeQuery {
    /// Create the binding, validating the configuration.
    pub fn new(config: SafeOperationConfig) -> SafeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            memo: Mutex::new(None),
        })
    }

    /// The configuration this instance derives with.
    pub fn config(&self) -> &SafeOperationConfig {
        &self.config
    }

    /// Replace the configuration, invalidating the memo.
    pub fn set_config(&mut self, config: SafeOperationConfig) -> SafeResult<()> {
        config.validate()?;
        self.config = config;
        *self.memo.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    /// Observe the latest transport snapshot, returning the derived outcome.
    pub fn observe(&self, state: &OperationState) -> Option<SafeOutcome> {
        let mut memo = self.memo.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((cached_state, cached_outcome)) = &*memo {
            if cached_state == state {
                return cached_outcome.clone();
            }
        }

        log_debug!(
            loading = state.loading,
            has_data = state.data.is_some(),
            has_error = state.error.is_some(),
            "Deriving safe outcome from changed snapshot"
        );
        let outcome = derive_safe_outcome(state, &self.config);
        *memo = Some((state.clone(), outcome.clone()));
        outcome
    }
}
