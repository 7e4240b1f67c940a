use blobgob_core::logging;
use console::style;
use std::process::ExitCode;

mod cli;

use crate::cli::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // Help is not a failure; anything else is a usage error.
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if cli.version {
        println!("{}", Cli::version_line());
        return ExitCode::SUCCESS;
    }

    // Initialize logging as early as possible; fall back to stderr if the log file is unavailable.
    if logging::init_logging(cli.verbose).is_err() {
        logging::init_logging_stderr();
    }

    cli::print_banner();
    cli::spawn_interrupt_monitor();

    let account = match cli.account() {
        Some(account) if !cli.missing_required() => account,
        _ => {
            println!("Provide the account, containers file, and directory prefixes file.");
            Cli::print_usage();
            return ExitCode::FAILURE;
        }
    };

    match cli::run_download(&cli, account).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{:#}", err);
            println!("{}", style(format!("Error: {:#}", err)).red());
            ExitCode::FAILURE
        }
    }
}
