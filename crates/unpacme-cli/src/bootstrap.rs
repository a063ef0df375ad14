//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where the HTTP adapter is instantiated.
//! Command handlers receive the port trait object through `CliContext`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;
use unpacme_api::{DefaultUnpacMeClient, UnpacMeClientConfig};
use unpacme_core::UnpacMeClientPort;

use crate::parser::Cli;

/// User agent sent when none is given on the command line.
pub fn default_user_agent() -> String {
    format!(
        "UnpacMeClient/{} (reqwest) {} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub ignore_quota: bool,
}

impl CliConfig {
    /// Resolve configuration from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            api_key: cli.api_key.clone(),
            base_url: cli.base_url.clone(),
            user_agent: cli.user_agent.clone().unwrap_or_else(default_user_agent),
            timeout: Duration::from_secs(cli.timeout),
            ignore_quota: cli.ignore_quota,
        }
    }

    fn client_config(&self) -> UnpacMeClientConfig {
        UnpacMeClientConfig::new()
            .with_base_url(self.base_url.clone())
            .with_user_agent(self.user_agent.clone())
            .with_timeout(self.timeout)
            .with_optional_api_key(self.api_key.clone())
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    /// The UnpacMe service, behind the core port.
    pub client: Arc<dyn UnpacMeClientPort>,
    /// Skip quota checks before uploads.
    pub ignore_quota: bool,
}

impl CliContext {
    pub fn client(&self) -> &Arc<dyn UnpacMeClientPort> {
        &self.client
    }
}

/// Bootstrap the CLI application.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext> {
    debug!(user_agent = %config.user_agent, base_url = %config.base_url, "Using client settings");
    if config.api_key.is_none() {
        debug!("No API key configured; private endpoints will be rejected");
    }

    let client = DefaultUnpacMeClient::new(&config.client_config())
        .context("Failed to create UnpacMe client")?;

    Ok(CliContext {
        client: Arc::new(client),
        ignore_quota: config.ignore_quota,
    })
}
