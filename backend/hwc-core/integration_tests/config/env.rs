use hwc_core::config::ProfileLayer;
use hwc_core::config::env::{ENV_ACCESS_KEY, ENV_DOMAIN_ID, ENV_REGION, ENV_SECRET_KEY};
use hwc_core::config::paths::{CONFIG_PATH_ENV, PathSource, resolve_config_path};

use std::collections::HashMap;
use std::path::Path;

use serial_test::serial;

/// **VALUE**: Verifies the environment layer reads the fixed variable names and drops
/// empty values.
///
/// **BUG THIS CATCHES**: Would catch a renamed variable or `FOO=""` being treated as set.
#[test]
fn given_lookup_when_env_layer_built_then_known_names_read_and_empty_dropped() {
    // GIVEN: A fake environment
    let vars: HashMap<&str, &str> = HashMap::from([
        ("HUAWEICLOUD_ACCESS_KEY", "env-ak"),
        ("HUAWEICLOUD_SECRET_KEY", "env-sk"),
        ("HUAWEICLOUD_REGION", ""),
        ("HUAWEICLOUD_DOMAIN_ID", "env-domain"),
        ("HUAWEICLOUD_PROJECT_ID", "env-project"),
        ("HUAWEICLOUD_ENTERPRISE_PROJECT_ID", "env-ep"),
        ("UNRELATED", "x"),
    ]);

    // WHEN: Building the layer
    let layer = ProfileLayer::from_env_with(|name| vars.get(name).map(|v| v.to_string()));

    // THEN: Known names are read, the empty region is absent
    assert_eq!(layer.access_key_id.as_deref(), Some("env-ak"));
    assert_eq!(
        layer.secret_access_key.as_ref().map(|s| s.as_str()),
        Some("env-sk")
    );
    assert_eq!(layer.region, None);
    assert_eq!(layer.domain_id.as_deref(), Some("env-domain"));
    assert_eq!(layer.project_id.as_deref(), Some("env-project"));
    assert_eq!(layer.enterprise_project_id.as_deref(), Some("env-ep"));
    assert_eq!(layer.output, None);
    assert_eq!(layer.max_retries, None);
}

#[test]
#[serial]
fn given_process_env_when_env_layer_built_then_values_read() {
    // SAFETY: serialised with every other test touching the process environment.
    unsafe {
        std::env::set_var(ENV_ACCESS_KEY, "proc-ak");
        std::env::set_var(ENV_SECRET_KEY, "proc-sk");
        std::env::remove_var(ENV_REGION);
        std::env::remove_var(ENV_DOMAIN_ID);
    }

    let layer = ProfileLayer::from_env();

    unsafe {
        std::env::remove_var(ENV_ACCESS_KEY);
        std::env::remove_var(ENV_SECRET_KEY);
    }

    assert_eq!(layer.access_key_id.as_deref(), Some("proc-ak"));
    assert_eq!(
        layer.secret_access_key.as_ref().map(|s| s.as_str()),
        Some("proc-sk")
    );
    assert_eq!(layer.region, None);
}

/// **VALUE**: Verifies config path lookup order: explicit, then HWCCTL_CONFIG, then home.
///
/// **BUG THIS CATCHES**: Would catch the env override beating an explicit `--config`.
#[test]
#[serial]
fn given_path_sources_when_resolved_then_order_respected() {
    // GIVEN: HWCCTL_CONFIG set
    // SAFETY: serialised with every other test touching the process environment.
    unsafe {
        std::env::set_var(CONFIG_PATH_ENV, "/tmp/from-env/config");
    }

    // WHEN: Resolving with and without an explicit path
    let explicit = resolve_config_path(Some(Path::new("/tmp/explicit/config")));
    let from_env = resolve_config_path(None);

    unsafe {
        std::env::remove_var(CONFIG_PATH_ENV);
    }
    let fallback = resolve_config_path(None);

    // THEN: Explicit wins, then env, then home or working directory
    assert_eq!(explicit.source, PathSource::Explicit);
    assert_eq!(explicit.path, Path::new("/tmp/explicit/config"));
    assert_eq!(from_env.source, PathSource::EnvVar);
    assert_eq!(from_env.path, Path::new("/tmp/from-env/config"));
    assert!(matches!(
        fallback.source,
        PathSource::HomeDir | PathSource::WorkingDirFallback
    ));
    assert!(fallback.path.ends_with(".hwcctl/config"));
}
