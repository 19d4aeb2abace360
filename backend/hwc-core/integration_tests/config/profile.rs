use hwc_core::config::{ProfileFile, ProfileLayer};
use hwc_core::error::ConfigError;

use tempfile::TempDir;

/// **VALUE**: Verifies a saved profile loads back with every field intact, secret included.
///
/// **WHY THIS MATTERS**: `RedactedSecret` refuses serialization on its own; the profile uses
/// a dedicated serde bridge. If the bridge breaks, the key silently vanishes from disk.
///
/// **BUG THIS CATCHES**: Would catch the secret being written as `[REDACTED]` or skipped.
#[test]
fn given_profile_when_saved_and_loaded_then_fields_preserved() {
    // GIVEN: A profile with every field set, in a directory that does not exist yet
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config");
    let profile = ProfileFile {
        default: ProfileLayer::default()
            .with_access_key_id("AK123")
            .with_secret_access_key("SK456")
            .with_region("cn-north-4")
            .with_domain_id("domain-1")
            .with_project_id("project-1")
            .with_enterprise_project_id("ep-1")
            .with_output("json")
            .with_retry(true, 4),
    };

    // WHEN: Saving and loading
    profile.save(&path).unwrap();
    let loaded = ProfileFile::load(&path).unwrap().unwrap();

    // THEN: Identical, and no temp file left behind
    assert_eq!(loaded.default, profile.default);
    assert_eq!(loaded.default.secret_access_key.unwrap().as_str(), "SK456");
    assert!(!dir.path().join("nested").join("config.tmp").exists());
}

#[cfg(unix)]
#[test]
fn given_saved_profile_when_permissions_checked_then_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    ProfileFile::default().save(&path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

/// **VALUE**: Verifies a world-readable temp file left by an interrupted save is narrowed
/// to owner-only before the secret is written into it.
///
/// **WHY THIS MATTERS**: The temp file holds the secret key in plain text. Reusing it with
/// its old mode would expose the key to other local users until the rename.
///
/// **BUG THIS CATCHES**: Would catch the secret being written with the file's existing or
/// default permissions and only restricted afterwards.
#[cfg(unix)]
#[test]
fn given_stale_world_readable_temp_file_when_saved_then_secret_written_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    // GIVEN: A leftover temp file, longer than the new contents and mode 0644
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    let temp_path = dir.path().join("config.tmp");
    std::fs::write(&temp_path, "x".repeat(4096)).unwrap();
    std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o644)).unwrap();

    // WHEN: Saving a profile with a secret
    let profile = ProfileFile {
        default: ProfileLayer::default().with_secret_access_key("SK456"),
    };
    profile.save(&path).unwrap();

    // THEN: Owner-only, no leftover bytes, and the temp file is gone
    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    let loaded = ProfileFile::load(&path).unwrap().unwrap();
    assert_eq!(loaded.default.secret_access_key.unwrap().as_str(), "SK456");
    assert!(!temp_path.exists());
}

#[test]
fn given_missing_file_when_loaded_then_none() {
    let dir = TempDir::new().unwrap();

    let loaded = ProfileFile::load(&dir.path().join("absent")).unwrap();

    assert!(loaded.is_none());
    assert!(ProfileLayer::from_file(&dir.path().join("absent")).is_empty());
}

/// **VALUE**: Verifies a malformed file is a parse error from `load`, but an empty layer
/// for resolution.
///
/// **WHY THIS MATTERS**: A typo in the profile must not stop a user who supplies every
/// credential through the environment.
///
/// **BUG THIS CATCHES**: Would catch `from_file` propagating the parse error.
#[test]
fn given_malformed_file_when_loaded_then_parse_error_but_empty_layer() {
    // GIVEN: A file that is not TOML
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    std::fs::write(&path, "[default\naccess_key_id = ").unwrap();

    // WHEN: Loading strictly and leniently
    let strict = ProfileFile::load(&path);
    let lenient = ProfileLayer::from_file(&path);

    // THEN: Strict reports the path, lenient is empty
    match strict {
        Err(ConfigError::ParseError { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected ParseError, got {other:?}"),
    }
    assert!(lenient.is_empty());
}

#[test]
fn given_hand_written_profile_when_loaded_then_unknown_output_kept_as_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config");
    std::fs::write(
        &path,
        "[default]\naccess_key_id = \"AK\"\nregion = \"ap-southeast-1\"\noutput = \"xml\"\n",
    )
    .unwrap();

    let layer = ProfileLayer::from_file(&path);

    assert_eq!(layer.access_key_id.as_deref(), Some("AK"));
    assert_eq!(layer.region.as_deref(), Some("ap-southeast-1"));
    assert_eq!(layer.output.as_deref(), Some("xml"));
    assert!(layer.secret_access_key.is_none());
}
