use std::{env, path::PathBuf, process::ExitCode};

use api::err::CustomError;
use clap::Parser;
use log::{warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

mod api;

/// Environment variable holding the log level
const LOG_LEVEL_VAR: &str = "SHIPMENTS_LOG_LEVEL";

/// Load a shipment data file and print or query its shipments.
#[derive(Parser, Debug)]
#[command(name = "shipment-tracker")]
struct Cli {
    /// Shipment data file, one shipment per line
    data_file: PathBuf,

    /// Query to run, prints all shipments when omitted
    #[command(subcommand)]
    command: Option<api::Command>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // .env is optional
    dotenv::dotenv().ok();

    let configured = env::var(LOG_LEVEL_VAR).ok();
    let level = log_level(configured.as_deref());
    // logs go to stderr, stdout carries the listing
    if let Err(err) = TermLogger::init(
        *level.as_ref().unwrap_or(&LevelFilter::Warn),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to set up logging: {}", err);
    }
    if let Err(value) = level {
        warn!("unknown {} {:?}, using warn", LOG_LEVEL_VAR, value);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CustomError> {
    let command = cli.command.unwrap_or(api::Command::Print);
    let handler = api::load_shipments(&cli.data_file)?;
    api::run(&handler, &command)
}

/// Level from the configured value, `warn` when unset
fn log_level(configured: Option<&str>) -> Result<LevelFilter, String> {
    match configured {
        None => Ok(LevelFilter::Warn),
        Some(value) => value.trim().parse::<LevelFilter>().map_err(|_| value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(None), Ok(LevelFilter::Warn));
        assert_eq!(log_level(Some("debug")), Ok(LevelFilter::Debug));
        assert_eq!(log_level(Some("OFF")), Ok(LevelFilter::Off));
        assert_eq!(log_level(Some("loud")), Err("loud".to_string()));
    }

    #[test]
    fn test_cli_default_command() {
        let cli = Cli::try_parse_from(["shipment-tracker", "shipments.txt"]).unwrap();
        assert_eq!(cli.data_file, PathBuf::from("shipments.txt"));
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_cli_queries() {
        let cli = Cli::try_parse_from(["shipment-tracker", "data.txt", "print"]).unwrap();
        assert_eq!(cli.command, Some(api::Command::Print));

        let cli = Cli::try_parse_from(["shipment-tracker", "data.txt", "find", "SH1"]).unwrap();
        assert_eq!(
            cli.command,
            Some(api::Command::Find {
                number: "SH1".to_string()
            })
        );

        let cli = Cli::try_parse_from(["shipment-tracker", "data.txt", "details", "SH1"]).unwrap();
        assert_eq!(
            cli.command,
            Some(api::Command::Details {
                number: "SH1".to_string()
            })
        );

        let cli = Cli::try_parse_from(["shipment-tracker", "data.txt", "order", "N/A"]).unwrap();
        assert_eq!(
            cli.command,
            Some(api::Command::Order {
                order_number: "N/A".to_string()
            })
        );
    }

    #[test]
    fn test_cli_rejects_bad_arguments() {
        for args in [
            &["shipment-tracker"][..],
            &["shipment-tracker", "data.txt", "find"][..],
            &["shipment-tracker", "data.txt", "lookup", "SH1"][..],
            &["shipment-tracker", "data.txt", "print", "SH1"][..],
            &["shipment-tracker", "data.txt", "find", "SH1", "SH2"][..],
        ] {
            assert!(Cli::try_parse_from(args).is_err(), "{:?}", args);
        }
    }
}
