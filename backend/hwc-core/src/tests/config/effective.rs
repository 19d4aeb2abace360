// Unit tests for EffectiveConfig and OutputFormat

use crate::config::{Credentials, EffectiveConfig, OutputFormat};
use crate::retry::{BackoffStrategy, RetryPolicy};

use common::RedactedSecret;

fn complete_config() -> EffectiveConfig {
    EffectiveConfig {
        credentials: Credentials {
            access_key_id: "AK".to_string(),
            secret_access_key: RedactedSecret::new("SK"),
            region: "cn-north-4".to_string(),
            ..Credentials::default()
        },
        ..EffectiveConfig::default()
    }
}

/// **VALUE**: Verifies validation names the first missing required field.
///
/// **WHY THIS MATTERS**: The message is shown to the operator verbatim; it must say which
/// setting to fix.
///
/// **BUG THIS CATCHES**: Would catch a missing check (e.g. secret key) letting unsigned
/// requests go out with an empty key.
#[test]
fn given_missing_required_fields_when_validated_then_first_missing_named() {
    // GIVEN: Configs each missing one required field
    let mut no_access = complete_config();
    no_access.credentials.access_key_id.clear();
    let mut no_secret = complete_config();
    no_secret.credentials.secret_access_key = RedactedSecret::default();
    let mut no_region = complete_config();
    no_region.credentials.region.clear();

    // THEN: Each fails naming its field; the complete one passes
    assert!(no_access.validate().unwrap_err().to_string().contains("access key"));
    assert!(no_secret.validate().unwrap_err().to_string().contains("secret key"));
    assert!(no_region.validate().unwrap_err().to_string().contains("region"));
    assert!(complete_config().validate().is_ok());
}

/// **VALUE**: Verifies the retry settings map to an attempt budget of `max_retries + 1`.
///
/// **BUG THIS CATCHES**: Would catch `max_retries` being used as the attempt count, which
/// silently drops one retry.
#[test]
fn given_retry_enabled_when_policy_built_then_attempts_is_retries_plus_one() {
    // GIVEN: Retries enabled with three retries
    let config = EffectiveConfig {
        enable_retry: true,
        max_retries: 3,
        ..complete_config()
    };

    // WHEN: Building the policy
    let policy = config.retry_policy();

    // THEN: Four attempts with the default schedule
    assert_eq!(policy.max_attempts, 4);
    assert_eq!(policy.strategy, BackoffStrategy::Exponential);
    assert_eq!(policy.base_delay, RetryPolicy::default().base_delay);
}

#[test]
fn given_retry_disabled_or_zero_when_policy_built_then_single_attempt() {
    let disabled = EffectiveConfig {
        enable_retry: false,
        max_retries: 5,
        ..complete_config()
    };
    let zero = EffectiveConfig {
        enable_retry: true,
        max_retries: 0,
        ..complete_config()
    };

    assert_eq!(disabled.retry_policy(), RetryPolicy::single_attempt());
    assert_eq!(zero.retry_policy(), RetryPolicy::single_attempt());
}

#[test]
fn given_output_names_when_parsed_then_case_insensitive_with_default_fallback() {
    assert_eq!(OutputFormat::from_name("JSON"), Some(OutputFormat::Json));
    assert_eq!(OutputFormat::from_name(" yaml "), Some(OutputFormat::Yaml));
    assert_eq!(OutputFormat::from_name("xml"), None);
    assert_eq!(OutputFormat::from_name_or_default(Some("xml")), OutputFormat::Table);
    assert_eq!(OutputFormat::from_name_or_default(None), OutputFormat::Table);
    assert_eq!(OutputFormat::Text.to_string(), "text");
}

/// **VALUE**: Verifies remote lookup is only possible with all three credentials.
///
/// **BUG THIS CATCHES**: Would catch an IAM call being attempted without a domain id,
/// which always fails and costs a full retry budget.
#[test]
fn given_partial_credentials_when_checked_then_iam_query_not_possible() {
    // GIVEN: Credentials without a domain id
    let mut credentials = complete_config().credentials;
    assert!(!credentials.can_query_iam());

    // WHEN: Adding the domain id
    credentials.domain_id = "d1".to_string();

    // THEN: Lookup is possible
    assert!(credentials.can_query_iam());
}
