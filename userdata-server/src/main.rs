use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use userdata_core::InMemoryCatalog;
use userdata_server::{
    AppState, create_app,
    infra::{
        config::{ConfigLoad, ConfigLoader, ConfigOverrides},
        settings_store::PluginSettingsStore,
    },
};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "userdata-server")]
#[command(
    about = "Media server host running the Disable UserData and Collections Accelerator plugins"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, env = "USERDATA_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Env file to read instead of `./.env`
    #[arg(long, env = "USERDATA_ENV_FILE")]
    env_file: Option<PathBuf>,

    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Plugin settings file (overrides config)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// JSON catalog seed (overrides config)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut loader = ConfigLoader::new().with_overrides(ConfigOverrides {
        host: cli.host,
        port: cli.port,
        catalog_seed_path: cli.catalog,
        plugin_settings_path: cli.settings,
    });
    if let Some(path) = cli.config {
        loader = loader.with_config_path(path);
    }
    if let Some(path) = cli.env_file {
        loader = loader.with_env_file(path);
    }

    let ConfigLoad { config, warnings } =
        loader.load().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if config.metadata.env_file_loaded {
        info!("loaded env file");
    }
    if let Some(path) = &config.metadata.config_path {
        info!(path = %path.display(), "loaded configuration file");
    }
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "configuration loaded with warnings");
        for warning in &warnings.items {
            match &warning.hint {
                Some(hint) => {
                    warn!(message = %warning.message, hint = %hint, "configuration warning")
                }
                None => {
                    warn!(message = %warning.message, "configuration warning")
                }
            }
        }
    }

    let catalog = match &config.catalog.seed_path {
        Some(path) if path.exists() => InMemoryCatalog::load(path)
            .with_context(|| {
                format!("failed to load catalog seed {}", path.display())
            })?,
        _ => InMemoryCatalog::new(),
    };

    let settings = PluginSettingsStore::open(config.settings_path())
        .context("failed to open plugin settings")?;
    let disable_user_data = settings.disable_user_data();
    info!(
        enabled = disable_user_data.enabled,
        active = disable_user_data.is_active(),
        "disable userdata plugin ready"
    );

    let bind_address = config.bind_address();
    let state = AppState::new(
        Arc::new(config),
        Arc::new(catalog),
        Arc::new(settings),
    );
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(bind_address.as_str())
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;
    let addr = listener.local_addr().context("listener has no address")?;
    info!(%addr, "starting userdata server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
