// Unit tests for logger module initialization logic
// Tests focus on idempotence, error handling and the debug switch

use crate::logger::{initialize, initialize_internal, level_for};

use std::path::PathBuf;

use log::LevelFilter;

/// **VALUE**: Verifies that calling initialize() multiple times doesn't panic or fail.
///
/// **WHY THIS MATTERS**: Tests and the binary may both initialise logging. If the second
/// call errors, startup fails for no reason.
///
/// **BUG THIS CATCHES**: Would catch if the Once or AtomicBool guards are removed,
/// causing fern to panic when trying to set a global logger twice.
#[test]
fn given_logger_initialized_when_called_again_then_returns_ok() {
    // GIVEN: A writable temporary directory
    let temp_dir = tempfile::TempDir::new().unwrap();

    // WHEN: Calling initialize twice
    let result1 = initialize(temp_dir.path());
    let result2 = initialize(temp_dir.path());

    // THEN: Both return Ok
    assert!(result1.is_ok(), "First initialization should succeed");
    assert!(
        result2.is_ok(),
        "Second initialization should succeed (idempotent)"
    );
}

/// **VALUE**: Verifies an unusable log directory is an error, not a panic.
///
/// **BUG THIS CATCHES**: Would catch `create_dir_all` or `fern::log_file()` being unwrapped.
#[test]
fn given_invalid_log_dir_when_initialized_then_returns_hwcctl_error() {
    // GIVEN: A path under a file, which can never be a directory
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN: Initializing without touching the global logger
    let result = initialize_internal(&invalid_dir, LevelFilter::Info);

    // THEN: Hwcctl error
    let err_string = format!("{:?}", result.unwrap_err());
    assert!(err_string.contains("Hwcctl"), "{err_string}");
}

#[test]
fn given_debug_flag_when_level_computed_then_debug() {
    assert_eq!(level_for(Some("1")), LevelFilter::Debug);
    assert_eq!(level_for(Some("true")), LevelFilter::Debug);
    assert_ne!(level_for(Some("0")), LevelFilter::Debug);
    assert_ne!(level_for(None), LevelFilter::Debug);
}
