//! Sample data command.
//!
//! # Usage
//!
//! ```bash
//! # Insert the sample recipes if the recipe table is empty
//! recipe-box seed
//!
//! # Clear every table (including the shopping list) and reseed
//! recipe-box seed --reset
//! ```

use recipe_box_server::db::{self, seed};

/// Seed the sample recipes, applying migrations first.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the store can't be opened,
/// or seeding fails.
pub async fn run(reset: bool) -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;
    db::run_migrations(&pool).await?;

    if reset {
        let count = seed::reset_and_seed(&pool).await?;
        tracing::info!(recipes = count, "Store reset and seeded");
        return Ok(());
    }

    match seed::seed_if_empty(&pool).await? {
        seed::SeedOutcome::Seeded(count) => {
            tracing::info!(recipes = count, "Seeded sample recipes");
        }
        seed::SeedOutcome::AlreadyPopulated => {
            tracing::info!("Recipes already present; use --reset to replace them");
        }
    }

    Ok(())
}
