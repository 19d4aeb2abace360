use hwc_core::{CloudError, ErrorKind};

use common::HttpStatusCode;

/// **VALUE**: Verifies `CloudError` Display carries code, message, request id and location.
///
/// **WHY THIS MATTERS**: Non-retryable errors are reported to the operator verbatim; the
/// request id is what the provider's support needs.
///
/// **BUG THIS CATCHES**: Would catch the request id suffix being dropped or the location
/// no longer pointing at the construction site.
#[test]
fn given_cloud_error_with_request_id_when_formatted_then_includes_all_parts() {
    // GIVEN: An auth error with a request id
    let error = CloudError::auth("signature mismatch").with_request_id("req-9");

    // WHEN: Formatting
    let text = error.to_string();

    // THEN: All parts present
    assert!(text.starts_with("[AuthenticationFailed] signature mismatch (RequestID: req-9)"));
    assert!(text.contains("cloud.rs"), "{text}");
}

#[test]
fn given_empty_request_id_when_attached_then_ignored() {
    let error = CloudError::server("down").with_request_id("");

    assert_eq!(error.request_id(), None);
    assert!(!error.to_string().contains("RequestID"));
}

/// **VALUE**: Verifies builder methods never change the retry verdict.
///
/// **BUG THIS CATCHES**: Would catch a builder recomputing `retryable` from details.
#[test]
fn given_error_when_details_attached_then_verdict_unchanged() {
    // GIVEN: A non-retryable and a retryable error
    let auth = CloudError::auth("no").with_details("ServiceUnavailable");
    let throttle = CloudError::from_status(HttpStatusCode::TOO_MANY_REQUESTS, "")
        .with_details("Invalid");

    // THEN: Verdicts fixed at construction
    assert!(!auth.is_retryable());
    assert!(throttle.is_retryable());
    assert_eq!(throttle.kind(), ErrorKind::Throttle);
    assert_eq!(throttle.message(), "request rate too high");
}

#[test]
fn given_kinds_when_named_then_stable_strings() {
    assert_eq!(ErrorKind::Auth.to_string(), "AuthenticationError");
    assert_eq!(ErrorKind::Throttle.as_str(), "ThrottleError");
    assert_eq!(ErrorKind::Unknown.as_str(), "UnknownError");
}

#[test]
fn given_not_found_when_built_then_names_resource() {
    let error = CloudError::not_found("project for region cn-north-4");

    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert!(error.message().contains("project for region cn-north-4"));
}
