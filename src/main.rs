mod analysis;
mod api;
mod cli;
mod config;
mod error;
mod logging;
mod models;

use anyhow::Context;
use clap::Parser;
use cli::{App, Cli};
use config::Config;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().with_context(|| {
        format!(
            "Failed to load configuration. Is {} set? A free token is available at https://aqicn.org/data-platform/token/",
            config::TOKEN_VAR
        )
    })?;

    // Keep the guard alive so the file sink is flushed on exit.
    let _log_guard = logging::init(config.log_dir.as_deref());

    info!("Initializing AQI tracker...");
    let app = App::new(config);

    app.run(cli).await.map_err(|e| {
        error!("Command execution failed: {:?}", e);
        e
    })?;

    Ok(())
}
