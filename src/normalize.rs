//! Normalization of raw GraphQL errors and transport-level error bundles.
//!
//! Classification precedence (server-declared extension codes, then message
//! sniffing, then network-failure detection) lives here so every entry point
//! into the safety layer resolves kinds identically.

use crate::error::{CanonicalError, ErrorKind};
use crate::logging::log_warn;
use crate::response::{ErrorLocation, PathSegment};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single raw GraphQL error, normalized into a uniform shape.
///
/// Carries no kind classification itself; classification happens at
/// aggregation time over the full error list.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NormalizedError {
    /// Error message, defaulted when the raw object carried none.
    pub message: String,
    /// Path to the field that caused the error.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathSegment>,
    /// Locations in the query source.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<ErrorLocation>,
    /// Machine-readable code, from `extensions.code` or a top-level `code`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Full extensions mapping, kept for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

/// An error raised by the GraphQL client, bundling zero or more protocol
/// errors and/or a network-level failure.
///
/// Any transport can produce this shape; the safety layer never depends on a
/// specific client library's error class. "Looks like a transport bundle" is
/// expressed as a typed downcast to this struct rather than field sniffing.
#[derive(Debug, Clone, Default, PartialEq, Error, Deserialize, Serialize)]
#[error("{message}")]
pub struct TransportError {
    /// The transport's own message, possibly empty.
    #[serde(default)]
    pub message: String,
    /// Protocol-level GraphQL errors, kept raw.
    #[serde(default)]
    pub graphql_errors: Vec<Value>,
    /// Network-level failure payload, when connectivity itself failed.
    #[serde(default)]
    pub network_error: Option<Value>,
    /// Extra diagnostic payload the transport attached.
    #[serde(default)]
    pub extra: Option<Value>,
}

impl TransportError {
    /// A transport error with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// A transport error bundling protocol-level GraphQL errors.
    pub fn graphql(message: impl Into<String>, graphql_errors: Vec<Value>) -> Self {
        Self {
            message: message.into(),
            graphql_errors,
            ..Self::default()
        }
    }

    /// A network-level failure (request never completed).
    pub fn network(message: impl Into<String>, cause: Value) -> Self {
        Self {
            message: message.into(),
            network_error: Some(cause),
            ..Self::default()
        }
    }
}

/// Normalize one raw GraphQL error object.
///
/// Pure and total: malformed fields degrade to defaults (`"GraphQL error"`
/// message, empty path/locations) rather than failing.
pub fn normalize_graphql_error(raw: &Value) -> NormalizedError {
    let message = raw
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .unwrap_or("GraphQL error")
        .to_string();

    let path = raw
        .get("path")
        .and_then(Value::as_array)
        .map(|segments| {
            segments
                .iter()
                .filter_map(|segment| match segment {
                    Value::String(name) => Some(PathSegment::Field(name.clone())),
                    Value::Number(n) => n.as_u64().map(|idx| PathSegment::Index(idx as usize)),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let locations = raw
        .get("locations")
        .and_then(Value::as_array)
        .map(|locations| {
            locations
                .iter()
                .filter_map(|loc| {
                    Some(ErrorLocation {
                        line: loc.get("line")?.as_u64()? as u32,
                        column: loc.get("column")?.as_u64()? as u32,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let extensions = raw
        .get("extensions")
        .and_then(Value::as_object)
        .cloned();

    // Server-declared extension code first, top-level code as fallback
    let code = extensions
        .as_ref()
        .and_then(|ext| ext.get("code"))
        .or_else(|| raw.get("code"))
        .and_then(Value::as_str)
        .map(str::to_string);

    NormalizedError {
        message,
        path,
        locations,
        code,
        extensions,
    }
}

/// Resolve one canonical kind for a set of normalized errors plus an optional
/// transport-level failure.
///
/// Precedence, first match wins:
/// 1. Any error with an extension code, matched by uppercase substring.
///    Server-declared codes are the most trustworthy signal.
/// 2. The first error's message text, for backends that never set codes.
/// 3. A network-level fault with no GraphQL errors at all.
/// 4. `Unknown`.
///
/// Pure function; identical inputs always resolve identically.
pub fn resolve_error_kind(
    transport: Option<&TransportError>,
    normalized: &[NormalizedError],
) -> ErrorKind {
    for error in normalized {
        if let Some(code) = &error.code {
            let code = code.to_uppercase();
            if code.contains("UNAUTH") {
                return ErrorKind::AuthenticationRequired;
            }
            if code.contains("FORBIDDEN") {
                return ErrorKind::Forbidden;
            }
            if code.contains("BAD_USER_INPUT") {
                return ErrorKind::BadUserInput;
            }
            if code.contains("VALIDATION") {
                return ErrorKind::ValidationError;
            }
            if code.contains("NOT_FOUND") {
                return ErrorKind::NotFound;
            }
            if code.contains("RATE_LIMIT") {
                return ErrorKind::RateLimited;
            }
        }
    }

    if let Some(first) = normalized.first() {
        let message = first.message.to_lowercase();
        if message.contains("authentication required") || message.contains("unauth") {
            return ErrorKind::AuthenticationRequired;
        }
        if message.contains("forbidden") {
            return ErrorKind::Forbidden;
        }
        if message.contains("validation") {
            return ErrorKind::ValidationError;
        }
    }

    if normalized.is_empty() && transport.is_some_and(|t| t.network_error.is_some()) {
        return ErrorKind::NetworkError;
    }

    ErrorKind::Unknown
}

/// Normalize a transport-level error bundle into a [`CanonicalError`].
///
/// Every bundled GraphQL error is normalized and preserved in original order;
/// the message is the first non-empty of: first normalized message, the
/// transport's own message, the resolved kind's default. `details` carries
/// the network error payload when present, else the transport's extra
/// diagnostics. Never fails.
pub fn normalize_transport_error(err: &TransportError) -> CanonicalError {
    let normalized: Vec<_> = err.graphql_errors.iter().map(normalize_graphql_error).collect();
    let kind = resolve_error_kind(Some(err), &normalized);

    let message = normalized
        .first()
        .map(|e| e.message.clone())
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let own = err.message.trim();
            (!own.is_empty()).then(|| err.message.clone())
        })
        .unwrap_or_else(|| kind.default_message().to_string());

    let details = err.network_error.clone().or_else(|| err.extra.clone());

    log_warn!(
        error_type = "transport_error",
        kind = %kind,
        graphql_error_count = normalized.len(),
        has_network_error = err.network_error.is_some(),
        "Normalized transport error"
    );

    let (path, locations) = normalized
        .first()
        .map(|e| (e.path.clone(), e.locations.clone()))
        .unwrap_or_default();

    let mut canonical = CanonicalError::new(kind, message)
        .with_source_position(path, locations)
        .with_original_errors(normalized);
    if let Some(details) = details {
        canonical = canonical.with_details(details);
    }
    canonical
}
