//! Contact Book - main entry point

use anyhow::Result;
use contact_book::server::spawn_flash_purger;
use contact_book::{build_app, run_server, AppState, Config, ContactStore, FlashStore, SqliteContactStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration comes first so LOG_LEVEL can seed the filter
    let config = Config::from_env()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        database = ?config.database,
        locale = %config.phone_locale,
        flash_ttl_seconds = config.flash_ttl_seconds,
        "Configuration loaded"
    );

    let store = match SqliteContactStore::open(&config.database) {
        Ok(store) => Arc::new(store) as Arc<dyn ContactStore>,
        Err(e) => {
            error!("Failed to open contact store: {}", e);
            return Err(e.into());
        }
    };

    let flash = FlashStore::new(config.flash_ttl());
    spawn_flash_purger(flash.clone(), config.flash_ttl());

    let state = AppState::new(store, flash, config.phone_locale);
    run_server(build_app(state), config.listen_addr()).await?;

    info!("Contact book shutdown complete");
    Ok(())
}
