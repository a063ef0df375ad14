//! CLI entry point - the composition root.
//!
//! Logging and configuration are set up here, the client is wired through
//! `bootstrap`, and each command is routed to its handler.

use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use unpacme_cli::handlers::{feed::FeedFilter, status::StatusArgs, upload::UploadArgs};
use unpacme_cli::{Cli, CliConfig, Commands, bootstrap, handlers};

/// Install the global subscriber. `RUST_LOG` wins over `--debug`.
fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Cancel `token` on the first Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after in-flight requests");
            token.cancel();
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.debug);

    let config = CliConfig::from_cli(&cli);
    let ctx = bootstrap(&config)?;
    debug!(timeout = ?config.timeout, ignore_quota = config.ignore_quota, "Bootstrapped");

    match cli.command {
        Commands::Quota => handlers::quota::execute(&ctx).await?,
        Commands::Search { sha256 } => handlers::search::execute(&ctx, &sha256).await?,
        Commands::Download { sha256, file_name } => {
            handlers::download::execute(&ctx, &sha256, file_name).await?;
        }
        Commands::Feed {
            children_only,
            completed_only,
            malware_only,
            sha256,
        } => {
            let filter = FeedFilter {
                children_only,
                completed_only,
                malware_only,
            };
            handlers::feed::execute(&ctx, filter, sha256).await?;
        }
        Commands::History => handlers::history::execute(&ctx).await?,
        Commands::Status {
            upload_id,
            list,
            details,
            download_unpacked_files,
        } => {
            let args = StatusArgs {
                list,
                details,
                download_unpacked_files,
            };
            handlers::status::execute(&ctx, &upload_id, args).await?;
        }
        Commands::Upload {
            file_names,
            force,
            print_id,
            poll_interval,
            max_polls,
        } => {
            let cancel = CancellationToken::new();
            cancel_on_ctrl_c(cancel.clone());
            let args = UploadArgs {
                file_names,
                force,
                print_id,
                poll_interval: Duration::from_secs(poll_interval),
                max_polls,
            };
            handlers::upload::execute(&ctx, args, &cancel).await?;
        }
    }

    Ok(())
}
