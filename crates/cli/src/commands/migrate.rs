//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! recipe-box migrate
//! ```
//!
//! Migrations are embedded from `crates/server/migrations/`; the server also
//! applies them at startup.

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the store can't be opened,
/// or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    recipe_box_server::db::run_migrations(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
