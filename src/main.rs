use anyhow::Result;
use codance::api::rest::RestApi;
use codance::config;
use codance::db::DatabaseService;
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    info!("Starting Codance backend");

    // Config file comes from the first argument or CODANCE_CONFIG
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CODANCE_CONFIG").ok());
    let config = config::load_config(config_path.as_deref().map(Path::new))?;
    info!("Configuration loaded");

    let database = DatabaseService::new(&config.database).await?;

    if !database.health_check().await? {
        warn!("Database health check failed at startup");
    }

    let api = RestApi::new(&config.api, &config.security, Arc::clone(&database.pool))?;
    api.run().await?;

    Ok(())
}
