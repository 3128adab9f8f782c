use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use partbook::cli::{self, Cli};
use partbook::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Ensure data directory exists
    std::fs::create_dir_all(&config.storage.data_dir).with_context(|| {
        format!(
            "Failed to create data directory: {}",
            config.storage.data_dir.display()
        )
    })?;

    // Initialize database
    let db = partbook::db::init(&config.storage.data_dir).await?;

    // Seed the bootstrap admin account when one is configured
    if let Some(password) = &config.auth.admin_password {
        partbook::auth::ensure_admin_user(&db, &config.auth.admin_username, password).await?;
    }

    cli::run(cli, &db).await
}
