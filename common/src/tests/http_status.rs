// Unit tests for HttpStatusCode categorisation

use crate::HttpStatusCode;

/// **VALUE**: Pins down which status codes count as transient.
///
/// **WHY THIS MATTERS**: The retry engine trusts this verdict. Marking 401 as retryable
/// would hammer the API with bad credentials; missing 503 would give up on a blip.
///
/// **BUG THIS CATCHES**: Would catch a regression back to a short allow-list that forgets
/// plain 500 or a 5xx code outside 502-504.
#[test]
fn given_status_codes_when_is_retryable_checked_then_only_throttle_and_5xx_qualify() {
    // GIVEN: Transient and permanent codes
    let retryable = [429, 500, 501, 502, 503, 504, 599];
    let permanent = [200, 301, 400, 401, 403, 404, 409, 422];

    // WHEN/THEN: Checking each
    for code in retryable {
        assert!(HttpStatusCode(code).is_retryable(), "{code} should be retryable");
    }
    for code in permanent {
        assert!(!HttpStatusCode(code).is_retryable(), "{code} should not be retryable");
    }
}

/// **VALUE**: Verifies the 4xx/5xx range boundaries.
///
/// **WHY THIS MATTERS**: Classification falls back to these ranges for codes without a
/// dedicated entry (e.g. 418, 507).
///
/// **BUG THIS CATCHES**: Off-by-one range bounds (e.g. `400..=500`).
#[test]
fn given_boundary_codes_when_categorised_then_ranges_are_half_open() {
    assert!(HttpStatusCode(400).is_client_error());
    assert!(HttpStatusCode(499).is_client_error());
    assert!(!HttpStatusCode(500).is_client_error());
    assert!(HttpStatusCode(500).is_server_error());
    assert!(!HttpStatusCode(600).is_server_error());
    assert!(HttpStatusCode(204).is_success());
}
