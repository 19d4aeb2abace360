// Unit tests for command line parsing

use crate::args::CliArgs;
use crate::error::HwcctlError;

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

/// **VALUE**: Verifies every flag lands in the override layer or the path.
///
/// **BUG THIS CATCHES**: Would catch a flag written to the wrong field, e.g. `--region`
/// setting the domain id.
#[test]
fn given_all_flags_when_parsed_then_overrides_populated() {
    // GIVEN: Every flag
    let args = [
        "hwcctl",
        "--config", "/tmp/hw/config",
        "--access-key", "AK",
        "--secret-key", "SK",
        "--region", "cn-north-4",
        "--domain-id", "d1",
        "--project-id", "p1",
        "--output", "json",
        "--refresh",
    ];

    // WHEN: Parsing and building the override layer
    let parsed = CliArgs::try_parse_from(args).unwrap();
    let overrides = parsed.overrides();

    // THEN: Fields populated
    assert_eq!(parsed.config_path, Some(PathBuf::from("/tmp/hw/config")));
    assert_eq!(overrides.access_key_id.as_deref(), Some("AK"));
    assert_eq!(
        overrides.secret_access_key.as_ref().map(|s| s.as_str()),
        Some("SK")
    );
    assert_eq!(overrides.region.as_deref(), Some("cn-north-4"));
    assert_eq!(overrides.domain_id.as_deref(), Some("d1"));
    assert_eq!(overrides.project_id.as_deref(), Some("p1"));
    assert_eq!(overrides.output.as_deref(), Some("json"));
    assert!(overrides.max_retries.is_none());
    assert!(parsed.refresh);
    assert!(parsed.wants_json());
}

#[test]
fn given_no_flags_when_parsed_then_empty_overrides() {
    let parsed = CliArgs::try_parse_from(["hwcctl"]).unwrap();

    assert!(parsed.overrides().is_empty());
    assert_eq!(parsed.config_path, None);
    assert!(!parsed.refresh);
}

/// **VALUE**: Verifies a secret key starting with dashes is accepted as a value.
///
/// **WHY THIS MATTERS**: Generated secret keys may begin with `-`. Rejecting them would
/// force users to put the secret in the environment or a file.
///
/// **BUG THIS CATCHES**: Would catch `--secret-key --abc` being read as a missing value
/// followed by an unknown flag.
#[test]
fn given_secret_key_starting_with_dashes_when_parsed_then_value_kept() {
    // GIVEN: Key values that look like flags
    let args = ["hwcctl", "--access-key", "-AK", "--secret-key", "--abc"];

    // WHEN: Parsing
    let overrides = CliArgs::try_parse_from(args).unwrap().overrides();

    // THEN: Both values kept verbatim
    assert_eq!(overrides.access_key_id.as_deref(), Some("-AK"));
    assert_eq!(
        overrides.secret_access_key.as_ref().map(|s| s.as_str()),
        Some("--abc")
    );
}

/// **VALUE**: Verifies the parsed arguments never print the secret key.
///
/// **BUG THIS CATCHES**: Would catch the secret flag being stored as a plain `String`,
/// which `{:?}` logging would expose.
#[test]
fn given_secret_key_flag_when_debug_formatted_then_redacted() {
    let parsed = CliArgs::try_parse_from(["hwcctl", "--secret-key", "SKVERYSECRET"]).unwrap();

    let debug = format!("{parsed:?}");

    assert!(!debug.contains("SKVERYSECRET"), "{debug}");
}

/// **VALUE**: Verifies a value-taking flag with nothing after it is a usage error.
///
/// **BUG THIS CATCHES**: Would catch `--output` at the end of the line being accepted
/// with an empty value.
#[test]
fn given_flag_without_value_when_parsed_then_usage_error() {
    // GIVEN: A value-taking flag at the end, and one followed by another flag
    let trailing = CliArgs::try_parse_from(["hwcctl", "--output"]).unwrap_err();
    let swallowed = CliArgs::try_parse_from(["hwcctl", "--region", "--refresh"]).unwrap_err();

    // THEN: Both rejected, and converted errors exit with the usage code
    for error in [trailing, swallowed] {
        assert_ne!(error.kind(), ErrorKind::DisplayHelp);
        let converted = HwcctlError::from(error);
        assert!(matches!(converted, HwcctlError::Usage { .. }));
        assert_eq!(converted.exit_code(), 2);
    }
}

#[test]
fn given_unknown_flag_when_parsed_then_unknown_argument_error() {
    let error = CliArgs::try_parse_from(["hwcctl", "--verbose"]).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::UnknownArgument);
    assert!(HwcctlError::from(error).to_string().contains("--verbose"));
}

#[test]
fn given_help_flag_when_parsed_then_display_help() {
    let error = CliArgs::try_parse_from(["hwcctl", "--help"]).unwrap_err();

    assert_eq!(error.kind(), ErrorKind::DisplayHelp);
}
