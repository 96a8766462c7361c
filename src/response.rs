//! Raw GraphQL response shapes and the response assertion.
//!
//! [`GraphQLResponse`] mirrors the wire shape produced by executing a query
//! or mutation: optional `data`, optional top-level `errors`, optional
//! `extensions`. Raw errors are kept as opaque [`Value`]s so malformed or
//! non-standard error objects never fail deserialization; interpretation
//! happens in [`crate::normalize`].
//!
//! [`assert_graphql_response`] is the "assert or throw" gate: a value it
//! returns is guaranteed free of top-level errors, non-null, and populated at
//! every declared required path.

use crate::error::{CanonicalError, ErrorKind, FriendlyMessages, SafeResult};
use crate::logging::{log_debug, log_warn};
use crate::normalize::{normalize_graphql_error, resolve_error_kind};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A raw GraphQL execution result. Treated as opaque input; never mutated.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GraphQLResponse {
    /// The data returned by the query/mutation.
    #[serde(default)]
    pub data: Option<Value>,
    /// Top-level errors returned by the server, kept raw.
    #[serde(default)]
    pub errors: Option<Vec<Value>>,
    /// Extensions (tracing, caching info, etc.).
    #[serde(default)]
    pub extensions: Option<Value>,
}

impl GraphQLResponse {
    /// Build a response carrying only data.
    pub fn with_data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// Check if the response carries at least one top-level error.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

/// Location in the GraphQL query source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorLocation {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub column: u32,
}

impl std::fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Path segment in a GraphQL error path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Field name.
    Field(String),
    /// Array index.
    Index(usize),
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(name) => write!(f, "{}", name),
            Self::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

/// Format an error path as a dotted string.
pub fn format_path(path: &[PathSegment]) -> String {
    path.iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Walk a dot-path (`"createWidget.owner.id"`) into a JSON tree.
///
/// Each segment is an object key, or an array index when the current node is
/// an array and the segment parses as one. A missing segment or an explicit
/// `null` anywhere along the walk yields `None`; the walk itself never fails.
pub fn walk_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Options for [`assert_graphql_response`].
#[derive(Debug, Clone, Default)]
pub struct AssertOptions {
    /// Dot-paths that must resolve to a non-null value, walked from the
    /// response root, so the conventional `data.` prefix is spelled out
    /// (e.g. `"data.createWidget"`).
    pub required_paths: Vec<String>,
    /// Per-kind message overrides applied to any error this assertion raises.
    pub friendly_messages: FriendlyMessages,
}

/// Assert a raw execution result is safe to consume, returning its data.
///
/// In order:
/// 1. Any top-level errors: normalize them all (preserving order), resolve a
///    single kind over the full set, and fail with the first error's message
///    (or the caller's per-kind override).
/// 2. Null or absent data: fail as `Unknown`.
/// 3. Any declared required path that is missing or null: fail as `Unknown`
///    carrying the offending path in `details`.
///
/// Otherwise the data is returned unchanged. The returned value is safe to
/// destructure along every declared required path.
pub fn assert_graphql_response(
    response: GraphQLResponse,
    options: &AssertOptions,
) -> SafeResult<Value> {
    if let Some(raw_errors) = &response.errors {
        if !raw_errors.is_empty() {
            let normalized: Vec<_> = raw_errors.iter().map(normalize_graphql_error).collect();
            let kind = resolve_error_kind(None, &normalized);
            let first = &normalized[0];
            log_warn!(
                error_type = "graphql_errors",
                kind = %kind,
                error_count = normalized.len(),
                first_message = %first.message,
                "GraphQL response carried top-level errors"
            );
            return Err(CanonicalError::new(kind, first.message.clone())
                .with_source_position(first.path.clone(), first.locations.clone())
                .with_original_errors(normalized)
                .with_friendly_override(&options.friendly_messages));
        }
    }

    let data = match response.data {
        Some(data) if !data.is_null() => data,
        _ => {
            log_warn!(
                error_type = "missing_data",
                "GraphQL response carried neither data nor errors"
            );
            return Err(CanonicalError::of_kind(ErrorKind::Unknown)
                .with_friendly_override(&options.friendly_messages));
        }
    };

    for path in &options.required_paths {
        if !required_path_present(&data, path) {
            log_warn!(
                error_type = "missing_required_path",
                path = %path,
                "GraphQL response data missing a required path"
            );
            return Err(CanonicalError::of_kind(ErrorKind::Unknown)
                .with_details(json!({ "path": path }))
                .with_friendly_override(&options.friendly_messages));
        }
    }

    log_debug!(
        required_paths = options.required_paths.len(),
        "GraphQL response passed assertion"
    );
    Ok(data)
}

/// Check a required path against the data, honoring the `data.` prefix
/// convention: the walk starts at the response root, whose only child is the
/// (already known present) data object.
fn required_path_present(data: &Value, path: &str) -> bool {
    match path.split_once('.') {
        Some(("data", rest)) => walk_path(data, rest).is_some(),
        None => path == "data",
        Some(_) => false,
    }
}
