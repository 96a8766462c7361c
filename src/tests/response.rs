// Unit Tests for Response Assertion and Path Walking
//
// UNIT UNDER TEST: assert_graphql_response, walk_path, format_path
//
// BUSINESS RESPONSIBILITY:
//   - Guarantees a returned data value is free of top-level errors, non-null,
//     and populated at every declared required path
//   - Preserves all top-level errors for diagnostics even though only one
//     message surfaces
//   - Walks dot-paths with defined null-propagation, never failing mid-walk
//
// TEST COVERAGE:
//   - Error short-circuit even when data is present and well-formed
//   - Missing-data and missing-required-path failures
//   - Returned data passes through unchanged
//   - Null-propagation and index handling in the walker

use crate::error::ErrorKind;
use crate::response::{
    assert_graphql_response, format_path, walk_path, AssertOptions, GraphQLResponse, PathSegment,
};
use crate::tests::helpers::{error_response, raw_error, raw_error_with_code};
use serde_json::json;

mod walk_path_tests {
    use super::*;

    #[test]
    fn test_walks_nested_objects_and_array_indexes() {
        let tree = json!({
            "widgets": [
                { "id": "w1" },
                { "id": "w2" },
            ],
        });

        assert_eq!(walk_path(&tree, "widgets.1.id"), Some(&json!("w2")));
    }

    #[test]
    fn test_missing_segment_yields_none_without_panicking() {
        let tree = json!({ "a": { "b": 1 } });

        assert_eq!(walk_path(&tree, "a.c"), None);
        assert_eq!(walk_path(&tree, "a.b.c"), None);
        assert_eq!(walk_path(&tree, "x.y.z"), None);
    }

    #[test]
    fn test_explicit_null_counts_as_absent() {
        let tree = json!({ "a": { "b": null } });
        assert_eq!(walk_path(&tree, "a.b"), None);
    }

    #[test]
    fn test_format_path_renders_fields_and_indexes() {
        let path = vec![
            PathSegment::Field("widgets".to_string()),
            PathSegment::Index(1),
            PathSegment::Field("id".to_string()),
        ];
        assert_eq!(format_path(&path), "widgets.[1].id");
    }
}

mod assertion_tests {
    use super::*;

    #[test]
    fn test_top_level_errors_short_circuit_even_with_valid_data() {
        // Arrange: data is present and well-formed, but errors exist
        let response = error_response(Some(json!({ "x": 1 })), vec![raw_error("boom")]);

        // Act
        let result = assert_graphql_response(response, &AssertOptions::default());

        // Assert
        let error = result.unwrap_err();
        assert_eq!(error.message, "boom");
        assert_eq!(error.original_errors.len(), 1);
    }

    #[test]
    fn test_all_top_level_errors_preserved_for_diagnostics() {
        let response = error_response(
            None,
            vec![
                raw_error_with_code("first", "VALIDATION_FAILED"),
                raw_error("second"),
            ],
        );

        let error = assert_graphql_response(response, &AssertOptions::default()).unwrap_err();
        assert_eq!(error.kind, ErrorKind::ValidationError);
        assert_eq!(error.message, "first");
        assert_eq!(error.original_errors.len(), 2);
        assert_eq!(error.original_errors[1].message, "second");
    }

    #[test]
    fn test_absent_data_fails_as_unknown() {
        let response = GraphQLResponse::default();

        let error = assert_graphql_response(response, &AssertOptions::default()).unwrap_err();
        assert_eq!(error.kind, ErrorKind::Unknown);
        assert_eq!(error.message, ErrorKind::Unknown.default_message());
    }

    #[test]
    fn test_null_data_fails_as_unknown() {
        let response = GraphQLResponse::with_data(json!(null));

        let error = assert_graphql_response(response, &AssertOptions::default()).unwrap_err();
        assert_eq!(error.kind, ErrorKind::Unknown);
    }

    #[test]
    fn test_missing_required_path_fails_with_path_in_details() {
        // Arrange
        let response = GraphQLResponse::with_data(json!({ "a": {} }));
        let options = AssertOptions {
            required_paths: vec!["data.a.b".to_string()],
            ..AssertOptions::default()
        };

        // Act
        let error = assert_graphql_response(response, &options).unwrap_err();

        // Assert
        assert_eq!(error.kind, ErrorKind::Unknown);
        assert_eq!(error.details, Some(json!({ "path": "data.a.b" })));
    }

    #[test]
    fn test_present_required_path_returns_data_unchanged() {
        let response = GraphQLResponse::with_data(json!({ "a": { "b": 1 } }));
        let options = AssertOptions {
            required_paths: vec!["data.a.b".to_string()],
            ..AssertOptions::default()
        };

        let data = assert_graphql_response(response, &options).unwrap();
        assert_eq!(data, json!({ "a": { "b": 1 } }));
    }

    #[test]
    fn test_required_path_without_data_prefix_never_matches() {
        // Required paths walk from the response root; a path skipping the
        // conventional "data." prefix cannot resolve
        let response = GraphQLResponse::with_data(json!({ "a": 1 }));
        let options = AssertOptions {
            required_paths: vec!["a".to_string()],
            ..AssertOptions::default()
        };

        let error = assert_graphql_response(response, &options).unwrap_err();
        assert_eq!(error.kind, ErrorKind::Unknown);
    }

    #[test]
    fn test_friendly_override_applies_to_assertion_failures() {
        let response = error_response(None, vec![raw_error_with_code("raw", "VALIDATION_FAILED")]);
        let mut options = AssertOptions::default();
        options.friendly_messages.insert(
            ErrorKind::ValidationError,
            "Please check your input".to_string(),
        );

        let error = assert_graphql_response(response, &options).unwrap_err();
        assert_eq!(error.message, "Please check your input");
    }
}
