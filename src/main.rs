//! `dotman` command-line entry point.
use anyhow::Result;
use clap::Parser;

use dotman_cli::cli::{Cli, Command};
use dotman_cli::commands;
use dotman_cli::logging::{Logger, init_subscriber};

/// Install the subscriber for `command` and run it with a fresh logger.
fn with_logger(
    verbose: bool,
    command: &str,
    run: impl FnOnce(&Logger) -> Result<()>,
) -> Result<()> {
    init_subscriber(verbose, command);
    let log = Logger::new(command);
    run(&log)
}

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let (verbose, name, global) = (args.verbose, args.command.name(), &args.global);

    match &args.command {
        Command::List(opts) => with_logger(verbose, name, |log| {
            commands::list::run(global, opts, log)
        }),
        Command::Deploy(opts) => with_logger(verbose, name, |log| {
            commands::deploy::run(global, opts, log)
        }),
        Command::Import(opts) => with_logger(verbose, name, |log| {
            commands::import::run(global, opts, log)
        }),
        Command::Changes(opts) => with_logger(verbose, name, |log| {
            commands::changes::run(global, opts, log)
        }),
        Command::Completions { shell } => commands::completions::run(*shell),
        Command::Version => commands::version::run(),
    }
}
