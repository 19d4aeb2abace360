// Unit tests for layered resolution
// Focus: per-field precedence and defaults

use crate::config::ProfileLayer;
use crate::config::resolver::{CredentialResolver, merge_layers};
use crate::project_id::ProjectIdResolver;
use crate::{DEFAULT_ENTERPRISE_PROJECT_ID, DEFAULT_REGION, OutputFormat};

use std::sync::Arc;

/// **VALUE**: Verifies precedence is decided per field, not per layer.
///
/// **WHY THIS MATTERS**: A user who exports only `HUAWEICLOUD_REGION` must still get the
/// keys from their profile file.
///
/// **BUG THIS CATCHES**: Would catch "first non-empty layer wins for everything".
#[test]
fn given_fields_spread_across_layers_when_merged_then_each_field_from_highest_layer() {
    // GIVEN: Each layer contributes a different subset
    let file = ProfileLayer::default()
        .with_access_key_id("file-ak")
        .with_secret_access_key("file-sk")
        .with_region("file-region")
        .with_domain_id("file-domain");
    let env = ProfileLayer::default().with_region("env-region");
    let overrides = ProfileLayer::default().with_access_key_id("flag-ak");

    // WHEN: Merging highest first
    let config = merge_layers(&[&overrides, &env, &file]);

    // THEN: Every field comes from the highest layer that sets it
    assert_eq!(config.credentials.access_key_id, "flag-ak");
    assert_eq!(config.credentials.secret_access_key.as_str(), "file-sk");
    assert_eq!(config.credentials.region, "env-region");
    assert_eq!(config.credentials.domain_id, "file-domain");
}

/// **VALUE**: Verifies an empty string in a higher layer does not mask a lower one.
///
/// **BUG THIS CATCHES**: Would catch `HUAWEICLOUD_ACCESS_KEY=""` wiping the profile key.
#[test]
fn given_empty_value_in_higher_layer_when_merged_then_falls_through() {
    // GIVEN: An override with empty strings
    let overrides = ProfileLayer::default()
        .with_access_key_id("")
        .with_secret_access_key("");
    let file = ProfileLayer::default()
        .with_access_key_id("file-ak")
        .with_secret_access_key("file-sk");

    // WHEN: Merging
    let config = merge_layers(&[&overrides, &file]);

    // THEN: Lower layer values survive
    assert_eq!(config.credentials.access_key_id, "file-ak");
    assert_eq!(config.credentials.secret_access_key.as_str(), "file-sk");
}

#[test]
fn given_no_layers_when_merged_then_defaults_applied() {
    let config = merge_layers(&[]);

    assert_eq!(config.credentials.region, DEFAULT_REGION);
    assert_eq!(
        config.credentials.enterprise_project_id,
        DEFAULT_ENTERPRISE_PROJECT_ID
    );
    assert!(config.credentials.project_id.is_empty());
    assert_eq!(config.output_format, OutputFormat::Table);
    assert!(!config.enable_retry);
    assert_eq!(config.max_retries, 0);
}

#[test]
fn given_operational_settings_when_merged_then_highest_layer_wins() {
    let file = ProfileLayer::default().with_output("json").with_retry(true, 5);
    let overrides = ProfileLayer {
        max_retries: Some(1),
        ..ProfileLayer::default()
    };

    let config = merge_layers(&[&overrides, &file]);

    assert_eq!(config.output_format, OutputFormat::Json);
    assert_eq!(config.max_retries, 1);
    assert!(config.enable_retry);
}

/// **VALUE**: Verifies resolution re-initialises the bound project id resolver.
///
/// **WHY THIS MATTERS**: A project id cached for old credentials must never be used with
/// new ones.
///
/// **BUG THIS CATCHES**: Would catch `resolve` forgetting `init_with_config`.
#[tokio::test]
async fn given_cached_project_id_when_resolved_again_then_cache_invalidated() {
    // GIVEN: A resolver whose project id cache is loaded
    let project_ids = Arc::new(ProjectIdResolver::new());
    let resolver = CredentialResolver::new(Arc::clone(&project_ids));
    let first = ProfileLayer::default().with_project_id("p-old");
    resolver.resolve(&first, &ProfileLayer::default(), &ProfileLayer::default());
    assert_eq!(project_ids.project_id().await.unwrap(), "p-old");
    assert!(project_ids.is_loaded());

    // WHEN: Resolving a different configuration
    let second = ProfileLayer::default().with_project_id("p-new");
    resolver.resolve(&second, &ProfileLayer::default(), &ProfileLayer::default());

    // THEN: Cache is cleared and the new id resolves lazily
    assert!(!project_ids.is_loaded());
    assert_eq!(project_ids.cached_project_id(), "");
    assert_eq!(project_ids.project_id().await.unwrap(), "p-new");
}
