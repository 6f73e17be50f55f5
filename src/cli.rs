//! Command-line definitions (clap derive).
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI entry point for the cloud-config converter.
#[derive(Parser, Debug)]
#[command(
    name = "cloudcmd",
    about = "Convert cloud-config into shell commands for agentless provisioning",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert cloud-config into an ordered list of commands
    Convert(ConvertOpts),
    /// Check that cloud-config is well-formed and list its modules
    Validate(InputOpts),
    /// Convert cloud-config and execute the commands on this machine
    Run(RunOpts),
    /// Print version information
    Version,
}

/// Where to read the cloud-config payload from.
#[derive(Parser, Debug, Clone)]
pub struct InputOpts {
    /// Cloud-config file ("-" reads stdin)
    #[arg(default_value = "-")]
    pub input: PathBuf,
}

/// Output rendering for the `convert` subcommand.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One shell-quoted command per line
    #[default]
    Text,
    /// JSON array of `{program, args, stdin}` objects
    Json,
    /// Standalone POSIX shell script
    Script,
}

/// Options for the `convert` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ConvertOpts {
    /// Input selection.
    #[command(flatten)]
    pub input: InputOpts,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Options for the `run` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RunOpts {
    /// Input selection.
    #[command(flatten)]
    pub input: InputOpts,

    /// Preview commands without executing them
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Continue past failing commands (and past a partial conversion)
    #[arg(long)]
    pub keep_going: bool,
}
