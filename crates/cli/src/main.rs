//! envflat - Main Application Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use config::Settings;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod args;

use app::Application;
use args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().context("Failed to load settings")?;
    init_logging(&settings)?;
    settings.log_warnings();

    info!("Starting envflat v{}", env!("CARGO_PKG_VERSION"));

    let source = cli.source();
    let mut app = Application::new(&settings);
    if let Err(e) = app.run(source) {
        error!("{:#}", e);
        return Err(e);
    }

    info!("Wrote {} and {}", config::JSON_FILE_NAME, config::ENV_FILE_NAME);
    Ok(())
}

/// Initialize logging on stderr from the loaded settings
fn init_logging(settings: &Settings) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_new(&settings.log_level)
        .with_context(|| format!("Invalid log filter: {}", settings.log_level))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match settings.log_format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
    }

    if settings.log_level == "trace" || settings.log_level == "debug" {
        warn!("Debug/trace logging enabled");
    }

    Ok(())
}
