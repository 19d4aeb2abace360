// Unit tests for RedactedSecret
// Focus: the secret value must never leak through formatting or serde

use crate::RedactedSecret;

/// **VALUE**: Verifies Debug and Display never print the secret.
///
/// **WHY THIS MATTERS**: Credentials end up inside structs that get logged with `{:?}`.
///
/// **BUG THIS CATCHES**: Would catch someone replacing the manual Debug impl with
/// `#[derive(Debug)]`.
#[test]
fn given_secret_when_formatted_then_value_is_redacted() {
    // GIVEN: A secret
    let secret = RedactedSecret::new("super-secret-value");

    // WHEN: Formatting it both ways
    let debug = format!("{secret:?}");
    let display = format!("{secret}");

    // THEN: Neither contains the value
    assert!(!debug.contains("super-secret-value"));
    assert!(!display.contains("super-secret-value"));
    assert_eq!(secret.as_str(), "super-secret-value");
}

/// **VALUE**: Verifies serialization is refused.
///
/// **WHY THIS MATTERS**: A config struct serialized to JSON for output must not carry the
/// secret along by accident.
///
/// **BUG THIS CATCHES**: Would catch a derived `Serialize`.
#[test]
fn given_secret_when_serialized_then_returns_error() {
    // GIVEN: A secret
    let secret = RedactedSecret::new("abc");

    // WHEN: Serializing
    let result = serde_json::to_string(&secret);

    // THEN: Serialization fails
    assert!(result.is_err(), "RedactedSecret must not serialize");
}

/// **VALUE**: Verifies the masking shown in configuration summaries.
///
/// **WHY THIS MATTERS**: Operators recognise their key by its prefix; the rest must stay
/// hidden, and short values must be hidden entirely.
///
/// **BUG THIS CATCHES**: Would catch byte-based slicing (panics on multi-byte input) or
/// showing the prefix of a 4-character secret.
#[test]
fn given_secrets_of_various_lengths_when_masked_then_only_prefix_is_visible() {
    assert_eq!(RedactedSecret::new("").masked(), "");
    assert_eq!(RedactedSecret::new("abcd").masked(), "****");
    assert_eq!(RedactedSecret::new("AKIA1234").masked(), "AKIA****");
    assert_eq!(RedactedSecret::new("密钥密钥密钥").masked(), "密钥密钥**");
}
