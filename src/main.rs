use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newswatch::app::AppContext;
use newswatch::cli::{commands, Cli, Commands};
use newswatch::config::Config;
use newswatch::daemon::{Daemon, DaemonConfig};
use newswatch::domain::SettingsUpdate;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newswatch=info")))
        .init();

    let cli = Cli::parse();
    let config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(&config, cli.data)?;

    match cli.command {
        Commands::Status => commands::show_status(&ctx)?,
        Commands::Items {
            filter,
            keyword,
            limit,
        } => commands::list_items(&ctx, filter, keyword, limit)?,
        Commands::Keywords => commands::list_keywords(&ctx)?,
        Commands::Add { keyword } => commands::add_keyword(&ctx, &keyword)?,
        Commands::Remove { keyword } => commands::remove_keyword(&ctx, &keyword)?,
        Commands::Scan => commands::scan(&ctx).await?,
        Commands::Save { id } => commands::toggle_saved(&ctx, &id)?,
        Commands::Settings {
            auto_scan,
            interval,
        } => commands::update_settings(
            &ctx,
            SettingsUpdate {
                auto_scan,
                interval_minutes: interval,
            },
        )?,
        Commands::Run {
            scan_now,
            settings_poll,
        } => {
            let settings_poll_secs =
                DaemonConfig::parse_interval(&settings_poll).map_err(anyhow::Error::msg)?;
            let daemon = Daemon::new(
                Arc::new(ctx),
                DaemonConfig {
                    settings_poll_secs,
                    scan_on_start: scan_now,
                },
            );
            daemon.run().await?;
        }
    }

    Ok(())
}
