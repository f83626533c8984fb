//! CLI command implementations.

pub mod migrate;
pub mod seed;

use recipe_box_server::config::ServerConfig;
use recipe_box_server::db;
use sqlx::SqlitePool;

/// Load configuration and open a pool on the configured store.
async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;
    Ok(pool)
}
