//! Clap derive structures for the `aegis` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// aegis -- status dashboard backend
#[derive(Debug, Parser)]
#[command(
    name = "aegis",
    version,
    about = "Serve a unified status dashboard API over ServiceNow, SolarWinds, and vendor status pages",
    long_about = "Aggregates outages, tickets, scheduled changes, monitoring alerts and\n\
        vendor status into one JSON API. Every panel degrades on its own when an\n\
        integration is unconfigured, missing credentials, or failing.",
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
    /// Deployment config file (defaults to the platform config dir)
    #[arg(long, env = "AEGIS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Serve demo data unless the settings file says otherwise
    #[arg(long, global = true)]
    pub demo: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the dashboard HTTP API
    Serve(ServeArgs),

    /// Query one dashboard endpoint and print the result
    Fetch(FetchArgs),

    /// Inspect deployment configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides the config file)
    #[arg(long, short = 'l')]
    pub listen: Option<String>,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Endpoint to query
    pub endpoint: Endpoint,

    /// Output format
    #[arg(long, short = 'o', default_value = "json")]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Endpoint {
    ActiveOutages,
    OutageHistory,
    Alerts,
    Tickets,
    ChangesToday,
    Vendors,
    ClientConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    JsonCompact,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file and settings file paths
    Path,

    /// Print the effective deployment configuration
    Show,
}
