use hwc_core::config::env::{
    ENV_ACCESS_KEY, ENV_DOMAIN_ID, ENV_ENTERPRISE_PROJECT_ID, ENV_PROJECT_ID, ENV_REGION,
    ENV_SECRET_KEY,
};
use hwc_core::config::{ProfileFile, ProfileLayer};
use hwc_core::error::ConfigError;
use hwc_core::{CredentialResolver, ProjectIdResolver};

use std::sync::Arc;

use serial_test::serial;
use tempfile::TempDir;

fn clear_credential_env() {
    // SAFETY: only called from #[serial] tests.
    unsafe {
        for name in [
            ENV_ACCESS_KEY,
            ENV_SECRET_KEY,
            ENV_REGION,
            ENV_DOMAIN_ID,
            ENV_PROJECT_ID,
            ENV_ENTERPRISE_PROJECT_ID,
        ] {
            std::env::remove_var(name);
        }
    }
}

fn isolated_resolver() -> (CredentialResolver, Arc<ProjectIdResolver>) {
    let project_ids = Arc::new(ProjectIdResolver::new());
    (CredentialResolver::new(Arc::clone(&project_ids)), project_ids)
}

/// **VALUE**: Verifies the full load path: file, then environment, then overrides.
///
/// **WHY THIS MATTERS**: This is exactly what the CLI does at startup.
///
/// **BUG THIS CATCHES**: Would catch the environment being read below the file.
#[tokio::test]
#[serial]
async fn given_file_env_and_override_when_loaded_then_layers_combine() {
    // GIVEN: A profile file, one env var and one override
    clear_credential_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    ProfileFile {
        default: ProfileLayer::default()
            .with_access_key_id("file-ak")
            .with_secret_access_key("file-sk")
            .with_region("file-region")
            .with_enterprise_project_id("file-ep"),
    }
    .save(&path)
    .unwrap();
    // SAFETY: #[serial]
    unsafe {
        std::env::set_var(ENV_REGION, "env-region");
    }
    let overrides = ProfileLayer::default().with_access_key_id("flag-ak");
    let (resolver, project_ids) = isolated_resolver();

    // WHEN: Loading
    let config = resolver.load(Some(&path), &overrides);
    clear_credential_env();
    let config = config.unwrap();

    // THEN: Per-field precedence, and the project id resolver is primed
    assert_eq!(config.credentials.access_key_id, "flag-ak");
    assert_eq!(config.credentials.secret_access_key.as_str(), "file-sk");
    assert_eq!(config.credentials.region, "env-region");
    assert_eq!(project_ids.project_id().await.unwrap(), "file-ep");
}

/// **VALUE**: Verifies only validation can fail a load, not a missing file.
///
/// **BUG THIS CATCHES**: Would catch a missing profile being reported as a read error
/// instead of "access key must not be empty".
#[test]
#[serial]
fn given_no_file_and_no_env_when_loaded_then_validation_error() {
    // GIVEN: No profile and no credential variables
    clear_credential_env();
    let dir = TempDir::new().unwrap();
    let (resolver, _) = isolated_resolver();

    // WHEN: Loading
    let result = resolver.load(Some(&dir.path().join("absent")), &ProfileLayer::default());

    // THEN: Validation error naming the access key
    match result {
        Err(ConfigError::ValidationError { reason, .. }) => {
            assert!(reason.contains("access key"))
        }
        other => panic!("expected ValidationError, got {other:?}"),
    }
}
