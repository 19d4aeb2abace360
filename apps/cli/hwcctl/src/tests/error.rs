// Unit tests for error module
// Tests serialization (used for --output json) and conversions

use crate::error::HwcctlError;

use hwc_core::error::{ConfigError, ProjectIdError};

/// **VALUE**: Tests that errors serialize with a tagged variant name.
///
/// **WHY THIS MATTERS**: With `--output json`, scripts parse errors from stderr. The
/// `type` tag is how they tell a config problem from a usage problem.
///
/// **BUG THIS CATCHES**: Would catch removing `#[derive(Serialize)]` or the serde tag.
#[test]
fn given_hwcctl_error_when_serialized_then_tagged_json() {
    // GIVEN: A config error
    let err: HwcctlError = ConfigError::validation("region must not be empty").into();

    // WHEN: Serializing to JSON
    let json = serde_json::to_string(&err).unwrap();

    // THEN: Tagged with the variant and carrying the message
    assert!(json.contains(r#""type":"Config""#), "{json}");
    assert!(json.contains("region must not be empty"));
}

#[test]
fn given_project_id_error_when_converted_then_project_id_variant() {
    let err: HwcctlError = ProjectIdError::not_initialized().into();

    assert!(matches!(err, HwcctlError::ProjectId { .. }));
    assert!(err.to_string().starts_with("Project Id Error:"));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn given_usage_error_when_exit_code_requested_then_two() {
    let err = HwcctlError::usage("unknown argument '--nope'");

    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("--nope"));
}
