//! Clap derive structures for the `gwrotate` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gwrotate -- rotate the gateway address of a RouterOS segment
#[derive(Debug, Parser)]
#[command(
    name = "gwrotate",
    version,
    about = "Rotate the gateway address of a MikroTik RouterOS segment",
    long_about = "Moves the gateway of a /24 segment to a random address in a configured\n\
        range, points DHCP clients at it, blocks the retired address at the\n\
        firewall, and cycles the segment's radios so clients pick up the change.\n\n\
        Intended to run unattended from a scheduler.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config dir)
    #[arg(long, short = 'c', env = "GWROTATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GWROTATE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Log line format
    #[arg(long, env = "GWROTATE_LOG_FORMAT", default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Run lock file (defaults to the runtime dir)
    #[arg(long, env = "GWROTATE_LOCK_FILE", global = true)]
    pub lock_file: Option<PathBuf>,
}

// ── Output & Log Enums ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per line, for log shippers
    Json,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rotate the gateway now
    Run(RunArgs),

    /// Validate the configuration without contacting the router
    Check(RotationArgs),

    /// Resolve topology and draw a gateway without changing anything
    Plan(RotationArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Rotation Arguments ───────────────────────────────────────────────

/// Scheduler overrides, layered over the config file.
#[derive(Debug, Clone, Args)]
pub struct RotationArgs {
    /// Subnet prefix, three octets (e.g., 10.0.5)
    #[arg(long, env = "GWROTATE_SUBNET")]
    pub subnet: Option<String>,

    /// Lowest last octet for the new gateway
    #[arg(long, env = "GWROTATE_LOW", allow_negative_numbers = true)]
    pub low: Option<i64>,

    /// Highest last octet for the new gateway
    #[arg(long, env = "GWROTATE_HIGH", allow_negative_numbers = true)]
    pub high: Option<i64>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub rotation: RotationArgs,

    /// Validate, resolve and draw, then print the plan without mutating
    #[arg(long)]
    pub dry_run: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration (password redacted)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
