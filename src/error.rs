//! Error taxonomy and canonical error type for GraphQL operations.
//!
//! This module provides the closed set of error kinds the safety layer
//! classifies into, a guaranteed default message for every kind, and the
//! [`CanonicalError`] type all classification paths converge on.
//!
//! # Error Handling Example
//!
//! ```rust
//! use graphql_safe::{CanonicalError, ErrorKind, friendly_message, is_auth_error};
//!
//! fn handle_error(err: CanonicalError) {
//!     if is_auth_error(&err) {
//!         // Route to sign-in instead of showing a toast
//!         return;
//!     }
//!
//!     // Already resolved to a human-readable string
//!     println!("Tell user: {}", err.message);
//!
//!     match err.kind {
//!         ErrorKind::NetworkError => println!("Worth retrying"),
//!         ErrorKind::ValidationError => println!("Fix the input first"),
//!         _ => println!("{}", friendly_message(&err)),
//!     }
//! }
//! ```

use crate::logging::log_warn;
use crate::normalize::NormalizedError;
use crate::response::{ErrorLocation, PathSegment};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// Error taxonomy
// ============================================================================

/// Closed enumeration of canonical error kinds.
///
/// Classification happens once, at the boundary between the GraphQL transport
/// and calling code; everything downstream branches on this kind rather than
/// re-inspecting raw error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The caller must sign in before the operation can succeed.
    AuthenticationRequired,
    /// The session is missing or no longer valid.
    Unauthenticated,
    /// The caller is signed in but not allowed to perform this action.
    Unauthorized,
    /// Access to the resource is denied by server policy.
    Forbidden,
    /// The request carried input the server rejected outright.
    BadUserInput,
    /// One or more submitted fields failed validation.
    ValidationError,
    /// The request never completed at the network/transport level.
    NetworkError,
    /// The requested resource does not exist.
    NotFound,
    /// The server is throttling requests from this caller.
    RateLimited,
    /// Anything that does not match a more specific kind.
    Unknown,
}

impl ErrorKind {
    /// Default human-readable message for this kind.
    ///
    /// Total over the enum: adding a kind without a message is a compile
    /// error, so [`friendly_message`] can never produce an empty string.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "Please sign in to continue",
            Self::Unauthenticated => "Your session has expired. Please sign in again",
            Self::Unauthorized => "You are not allowed to perform this action",
            Self::Forbidden => "You do not have permission to access this resource",
            Self::BadUserInput => "Some of the provided information is invalid",
            Self::ValidationError => "Please review the highlighted fields and try again",
            Self::NetworkError => "Connection problem. Please check your network and try again",
            Self::NotFound => "The requested item could not be found",
            Self::RateLimited => "Too many requests. Please wait a moment and try again",
            Self::Unknown => "Something went wrong. Please try again",
        }
    }

    /// All kinds, in declaration order. Used by totality tests and callers
    /// that build complete per-kind override tables.
    pub const ALL: [ErrorKind; 10] = [
        Self::AuthenticationRequired,
        Self::Unauthenticated,
        Self::Unauthorized,
        Self::Forbidden,
        Self::BadUserInput,
        Self::ValidationError,
        Self::NetworkError,
        Self::NotFound,
        Self::RateLimited,
        Self::Unknown,
    ];
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Per-kind message overrides supplied by callers.
///
/// Applied as the last step of every classification path, so callers can
/// customize wording without altering classification logic.
pub type FriendlyMessages = HashMap<ErrorKind, String>;

// ============================================================================
// Canonical error
// ============================================================================

/// Convenient result type for the safety layer's fallible functions.
pub type SafeResult<T> = std::result::Result<T, CanonicalError>;

/// The normalized, taxonomy-classified error all core functions converge on.
///
/// Invariants:
/// - `message` is always a non-empty human string (first underlying message,
///   a friendly override, or the kind's default).
/// - `original_errors` preserves every underlying GraphQL error in original
///   order; classification never drops diagnostics.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct CanonicalError {
    /// Resolved error kind.
    pub kind: ErrorKind,
    /// Human-readable message, safe to surface in UI.
    pub message: String,
    /// Extra diagnostic payload (network error object, failed path, raw
    /// business payload). Never required for branching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Path of the first underlying GraphQL error, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
    /// Locations of the first underlying GraphQL error, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<ErrorLocation>,
    /// Every underlying GraphQL error, normalized, in original order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub original_errors: Vec<NormalizedError>,
}

impl CanonicalError {
    /// Create an error of the given kind with its default message.
    pub fn of_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.default_message())
    }

    /// Create an error with an explicit message.
    ///
    /// An empty or whitespace-only message falls back to the kind's default,
    /// upholding the non-empty-message invariant.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            kind.default_message().to_string()
        } else {
            message
        };
        Self {
            kind,
            message,
            details: None,
            path: Vec::new(),
            locations: Vec::new(),
            original_errors: Vec::new(),
        }
    }

    /// Create an `Unknown` error, logging the downgraded cause.
    ///
    /// Used at the outermost wrapper boundary where programming-error-level
    /// failures are caught instead of propagating as panics.
    pub fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        log_warn!(
            error_type = "unknown",
            message = %message,
            "Downgrading unclassified failure to Unknown"
        );
        Self::new(ErrorKind::Unknown, message)
    }

    /// Attach a diagnostic payload.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Attach the path/locations of the first underlying error.
    #[must_use]
    pub fn with_source_position(
        mut self,
        path: Vec<PathSegment>,
        locations: Vec<ErrorLocation>,
    ) -> Self {
        self.path = path;
        self.locations = locations;
        self
    }

    /// Attach the full ordered set of normalized underlying errors.
    #[must_use]
    pub fn with_original_errors(mut self, errors: Vec<NormalizedError>) -> Self {
        self.original_errors = errors;
        self
    }

    /// Replace the message with the caller's per-kind override, if one exists.
    ///
    /// This is the final step of every classification path.
    #[must_use]
    pub fn with_friendly_override(mut self, overrides: &FriendlyMessages) -> Self {
        if let Some(message) = overrides.get(&self.kind) {
            self.message = message.clone();
        }
        self
    }
}

// ============================================================================
// Helpers over arbitrary caught errors
// ============================================================================

/// Map any caught error to a displayable string.
///
/// A [`CanonicalError`] maps to its kind's default message; any other error
/// falls back to its own message, and an empty message falls back to the
/// `Unknown` default. Never returns an empty string.
pub fn friendly_message(err: &(dyn std::error::Error + 'static)) -> String {
    if let Some(canonical) = err.downcast_ref::<CanonicalError>() {
        return canonical.kind.default_message().to_string();
    }
    let message = err.to_string();
    if message.trim().is_empty() {
        ErrorKind::Unknown.default_message().to_string()
    } else {
        message
    }
}

/// Whether a caught error represents a missing/expired authentication.
///
/// True if the error is a [`CanonicalError`] of kind `AuthenticationRequired`
/// or `Unauthenticated`, or if its message mentions authentication,
/// case-insensitively.
pub fn is_auth_error(err: &(dyn std::error::Error + 'static)) -> bool {
    if let Some(canonical) = err.downcast_ref::<CanonicalError>() {
        if matches!(
            canonical.kind,
            ErrorKind::AuthenticationRequired | ErrorKind::Unauthenticated
        ) {
            return true;
        }
    }
    err.to_string().to_lowercase().contains("authenticat")
}
