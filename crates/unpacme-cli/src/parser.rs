//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;
use unpacme_api::DEFAULT_BASE_URL;

use crate::commands::Commands;

/// Command-line interface for the UnpacMe unpacking service.
///
/// Global options configure the HTTP client and apply to every subcommand.
#[derive(Parser)]
#[command(name = "unpacme")]
#[command(about = "Submit files to UnpacMe and inspect unpacking results")]
#[command(version)]
pub struct Cli {
    /// API key, see https://www.unpac.me/account
    #[arg(long, env = "UNPACME_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// API root to talk to
    #[arg(long, env = "UNPACME_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// User-Agent header sent with every request
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 5, global = true)]
    pub timeout: u64,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Skip the quota check before uploads
    #[arg(long, global = true)]
    pub ignore_quota: bool,

    #[command(subcommand)]
    pub command: Commands,
}
