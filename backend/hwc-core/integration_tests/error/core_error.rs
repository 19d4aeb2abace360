use hwc_core::error::{ConfigError, ProjectIdError, RetryError, RetryPolicyError};
use hwc_core::{CloudError, CoreError};

use std::error::Error;

/// **VALUE**: Verifies every error family converts into `CoreError` transparently.
///
/// **WHY THIS MATTERS**: The CLI propagates everything with `?` into one type; the
/// original message must survive the conversion.
///
/// **BUG THIS CATCHES**: Would catch a missing `#[from]` or a wrapper that adds its own
/// text.
#[test]
fn given_each_error_family_when_converted_then_message_preserved() {
    // GIVEN: One error from each family
    let errors: Vec<(CoreError, &str)> = vec![
        (ConfigError::validation("region must not be empty").into(), "region must not be empty"),
        (CloudError::network("reset").into(), "reset"),
        (ProjectIdError::not_initialized().into(), "Not Initialized"),
        (RetryPolicyError::invalid("jitter out of range").into(), "jitter out of range"),
        (
            RetryError::exhausted(3, CloudError::server("down")).into(),
            "gave up after 3 attempts",
        ),
    ];

    // THEN: Display passes through
    for (error, expected) in errors {
        assert!(error.to_string().contains(expected), "{error}");
    }
}

/// **VALUE**: Verifies the exhausted wrapper keeps the cause reachable through `source()`.
///
/// **BUG THIS CATCHES**: Would catch the cause being flattened into a string.
#[test]
fn given_exhausted_error_when_source_walked_then_cause_reached() {
    // GIVEN: An exhausted retry wrapped in CoreError
    let error: CoreError = RetryError::exhausted(2, CloudError::server("down")).into();

    // WHEN: Walking the source chain
    let cause = error.source().and_then(|e| e.downcast_ref::<CloudError>());

    // THEN: The original CloudError
    assert_eq!(cause.map(CloudError::message), Some("down"));
}

#[test]
fn given_validation_error_when_formatted_then_includes_location() {
    let error = ConfigError::validation("secret key must not be empty");

    let text = error.to_string();

    assert!(text.contains("secret key must not be empty"));
    assert!(text.contains("core_error.rs"), "{text}");
}
