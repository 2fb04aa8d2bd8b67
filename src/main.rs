use std::sync::Arc;
use tracing::info;

mod auth;
mod bus;
mod chat;
mod config;
mod entity;
mod interface;
mod manager;
mod preferences;
mod session;
mod store;
mod transcript;
mod webhook;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    if let Err(e) = dotenvy::dotenv() {
        // It's not fatal if .env doesn't exist, but good to know
        info!("No .env file found or failed to load: {}", e);
    }

    // Initialize logging with default filter if RUST_LOG is not set
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config::Config::from_env()?;
    info!("Nova chat starting, webhook at {}", config.webhook_url);

    let bus = Arc::new(bus::EventBus::new());

    info!("Initializing store at {}", config.db_path.display());
    let store = store::Store::new(&config.db_path).await?;
    store.init().await?;

    let client = webhook::WebhookClient::new(config.webhook_url.clone())?;
    let manager = Arc::new(manager::Manager::new(
        Arc::new(store.clone()),
        client,
        bus.clone(),
    ));

    let terminal = interface::terminal::TerminalInterface::new(
        bus,
        manager,
        store,
        auth::MockLogin::new(config.login_delay),
    );

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        res = terminal.run() => res?,
    }

    Ok(())
}
