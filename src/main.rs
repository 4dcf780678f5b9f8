//! Junket CLI entrypoint for storefront reviews.

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;

use junket::{JunketConfig, ReviewError};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

use crate::cli::Command;

mod cli;


/// Environment variable holding the tracing filter directive.
const LOG_ENV: &str = "JUNKET_LOG";

/// Flags whose next argument is their value rather than a command word.
const VALUE_FLAGS: &[&str] = &[
    "--api-base-url",
    "-a",
    "--image-upload-url",
    "-i",
    "--upload-preset",
    "-u",
    "--request-timeout-secs",
    "-r",
    "--session-path",
    "-s",
    "--target-id",
    "--target-type",
    "-k",
    "--sort",
    "--review-id",
    "--rating",
    "--comment",
    "-c",
    "--images",
    "--message",
    "-m",
    "--username",
    "--password",
    "--full-name",
    "--email",
    "--role",
    "--scope",
    "--config-path",
];

fn main() -> ExitCode {
    init_tracing();

    let outcome = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|error| ReviewError::Io {
            message: format!("failed to start the async runtime: {error}"),
        })
        .and_then(|runtime| {
            let result = runtime.block_on(run_until_cancelled());
            // A pending terminal prompt must not hold up exit after Ctrl-C.
            runtime.shutdown_background();
            result
        });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Races the command against Ctrl-C.
async fn run_until_cancelled() -> Result<(), ReviewError> {
    tokio::select! {
        result = run() => result,
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => Err(ReviewError::Cancelled),
            Err(error) => Err(ReviewError::Io { message: error.to_string() }),
        },
    }
}

/// Installs a stderr subscriber filtered by `JUNKET_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), ReviewError> {
    let (word, args) = extract_positional_command(std::env::args_os().collect());
    let command = word
        .as_deref()
        .map_or_else(|| Ok(Command::default()), str::parse)?;
    let config = load_config(args)?;

    cli::run(command, &config).await
}

/// Loads configuration from the filtered CLI arguments, environment, and
/// files.
///
/// # Errors
///
/// Returns [`ReviewError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config(args: Vec<OsString>) -> Result<JunketConfig, ReviewError> {
    JunketConfig::load_from_iter(args).map_err(|error| ReviewError::Configuration {
        message: error.to_string(),
    })
}

/// Splits the first positional argument (the command word) out of `args`.
///
/// The program name is never treated as positional. Values following a
/// known value-taking flag are skipped; `--flag=value` carries its own value.
/// Everything after `--` counts as positional and `--` itself is dropped.
pub(crate) fn extract_positional_command(args: Vec<OsString>) -> (Option<String>, Vec<OsString>) {
    let mut remaining = Vec::with_capacity(args.len());
    let mut command = None;
    let mut expects_value = false;
    let mut after_separator = false;

    for (index, arg) in args.into_iter().enumerate() {
        if index == 0 {
            remaining.push(arg);
            continue;
        }

        let text = arg.to_string_lossy().into_owned();
        let positional = after_separator || (!expects_value && !text.starts_with('-'));

        if command.is_none() && positional {
            command = Some(text);
            continue;
        }

        if !after_separator && !expects_value && text == "--" {
            after_separator = true;
            continue;
        }

        expects_value = !after_separator && !expects_value && VALUE_FLAGS.contains(&text.as_str());
        remaining.push(arg);
    }

    (command, remaining)
}
