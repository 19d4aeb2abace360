use hwcctl::app::run;
use hwcctl::args::CliArgs;
use hwcctl::error::HwcctlError;

use hwc_core::config::env::{
    ENV_ACCESS_KEY, ENV_DOMAIN_ID, ENV_ENTERPRISE_PROJECT_ID, ENV_PROJECT_ID, ENV_REGION,
    ENV_SECRET_KEY,
};
use hwc_core::config::{ProfileFile, ProfileLayer};
use hwc_core::{CredentialResolver, OutputFormat, ProjectIdResolver};

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
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

fn write_profile(path: &Path, layer: ProfileLayer) {
    ProfileFile { default: layer }.save(path).unwrap();
}

fn args_for(path: &Path, extra: &[&str]) -> CliArgs {
    let mut args = vec![
        "hwcctl".to_string(),
        "--config".to_string(),
        path.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    CliArgs::try_parse_from(args).unwrap()
}

/// **VALUE**: Verifies a full invocation from profile file to masked summary.
///
/// **WHY THIS MATTERS**: This is the whole startup path of the binary minus printing.
///
/// **BUG THIS CATCHES**: Would catch flags not outranking the profile, or the project id
/// not being resolved through the resolver the configuration initialised.
#[tokio::test]
#[serial]
async fn given_profile_and_flags_when_run_then_summary_reflects_precedence() {
    // GIVEN: A profile with keys and an enterprise project, and a region flag
    clear_credential_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    write_profile(
        &path,
        ProfileLayer::default()
            .with_access_key_id("AKPROFILE")
            .with_secret_access_key("profile-secret")
            .with_region("cn-north-1")
            .with_enterprise_project_id("ep-7")
            .with_output("yaml")
            .with_retry(true, 2),
    );
    let resolver = CredentialResolver::new(Arc::new(ProjectIdResolver::new()));

    // WHEN: Running with --region
    let outcome = run(&args_for(&path, &["--region", "ap-southeast-3"]), &resolver)
        .await
        .unwrap();

    // THEN: Flag wins for region, profile supplies the rest, secrets masked
    assert_eq!(outcome.output_format, OutputFormat::Yaml);
    assert_eq!(outcome.summary.region, "ap-southeast-3");
    assert_eq!(outcome.summary.project_id, "ep-7");
    assert_eq!(outcome.summary.access_key_id, "AKPR*****");
    assert_eq!(outcome.summary.secret_access_key, "prof**********");
    assert_eq!(outcome.summary.retry, "enabled (2 retries)");
    assert_eq!(outcome.summary.config_source, "explicit path");
}

/// **VALUE**: Verifies missing credentials surface as a config error.
///
/// **BUG THIS CATCHES**: Would catch a missing secret key reaching the signer.
#[tokio::test]
#[serial]
async fn given_profile_without_secret_when_run_then_config_error() {
    // GIVEN: Only an access key
    clear_credential_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    write_profile(&path, ProfileLayer::default().with_access_key_id("AK"));
    let resolver = CredentialResolver::new(Arc::new(ProjectIdResolver::new()));

    // WHEN: Running
    let result = run(&args_for(&path, &[]), &resolver).await;

    // THEN: Config error naming the secret key
    match result {
        Err(HwcctlError::Config { message, .. }) => assert!(message.contains("secret key")),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[tokio::test]
#[serial]
async fn given_refresh_flag_when_run_then_project_id_resolved_from_flag() {
    clear_credential_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    write_profile(
        &path,
        ProfileLayer::default()
            .with_access_key_id("AK")
            .with_secret_access_key("SK"),
    );
    let resolver = CredentialResolver::new(Arc::new(ProjectIdResolver::new()));

    let outcome = run(
        &args_for(&path, &["--project-id", "p-flag", "--refresh"]),
        &resolver,
    )
    .await
    .unwrap();

    assert_eq!(outcome.summary.project_id, "p-flag");
    assert!(resolver.project_ids().is_loaded());
}
