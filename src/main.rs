//! `cloudcmd` command-line entry point.
use anyhow::Result;
use clap::Parser;

use cloudcmd_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);

    match args.command {
        cli::Command::Convert(opts) => commands::convert::run(&opts),
        cli::Command::Validate(opts) => commands::validate::run(&opts),
        cli::Command::Run(opts) => commands::run::run(&opts),
        cli::Command::Version => commands::version::run(),
    }
}
