use hwcctl::app::run;
use hwcctl::args::CliArgs;
use hwcctl::error::HwcctlError;
use hwcctl::logger::initialize as LoggerInitialize;

use hwc_core::CredentialResolver;
use hwc_core::config::env::load_dotenv;
use hwc_core::config::paths::resolve_config_path;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use log::{debug, error};

const LOG_DIR_NAME: &str = "logs";

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let usage = HwcctlError::from(e);
            eprintln!("{usage}");
            return ExitCode::from(usage.exit_code());
        }
    };

    // .env first: it may set HWCCTL_CONFIG or HWCCTL_DEBUG
    let env_result = load_dotenv();

    let log_dir = resolve_config_path(args.config_path.as_deref())
        .path
        .parent()
        .map(|dir| dir.join(LOG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(LOG_DIR_NAME));
    if let Err(e) = LoggerInitialize(&log_dir) {
        eprintln!("Continuing without log file: {e}");
    }
    debug!("Dotenv: {env_result:?}");

    let json_errors = args.wants_json();

    let result = run(&args, &CredentialResolver::default())
        .await
        .and_then(|outcome| outcome.summary.render(outcome.output_format));

    match result {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            report(&e, json_errors);
            ExitCode::from(e.exit_code())
        }
    }
}

fn report(e: &HwcctlError, json: bool) {
    error!("{e}");
    match serde_json::to_string_pretty(e) {
        Ok(encoded) if json => eprintln!("{encoded}"),
        _ => eprintln!("{e}"),
    }
}
