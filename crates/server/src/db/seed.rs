//! Sample recipe seeding.
//!
//! The sample set is embedded from `seed/recipes.yaml` and inserted through
//! the same aggregate path as `POST /recipes`, so seeded tags are shared by
//! name exactly like client-created ones.

use serde::Deserialize;
use sqlx::{SqliteConnection, SqlitePool};

use recipe_box_core::RecipeId;

use super::RepositoryError;
use super::recipes::insert_aggregate;
use crate::models::recipe::CreateRecipeInput;

const SEED_YAML: &str = include_str!("../../seed/recipes.yaml");

/// Tables cleared by a reset, children and junctions before their parents.
const RESET_ORDER: [&str; 7] = [
    "recipe_tag",
    "ingredient",
    "instruction",
    "nutrition_fact",
    "recipe",
    "tag",
    "shopping_item",
];

/// One embedded sample recipe.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRecipe {
    pub id: RecipeId,
    #[serde(flatten)]
    pub recipe: CreateRecipeInput,
}

/// What `seed_if_empty` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty and this many recipes were inserted.
    Seeded(usize),
    /// The store already held recipes; nothing was written.
    AlreadyPopulated,
}

/// Parse and validate the embedded sample recipes.
///
/// # Errors
///
/// Returns `RepositoryError::Seed` if the embedded YAML is malformed or a
/// recipe fails validation.
pub fn sample_recipes() -> Result<Vec<SeedRecipe>, RepositoryError> {
    let recipes: Vec<SeedRecipe> =
        serde_yaml::from_str(SEED_YAML).map_err(|e| RepositoryError::Seed(e.to_string()))?;

    for seed in &recipes {
        seed.recipe
            .validate()
            .map_err(|e| RepositoryError::Seed(format!("{}: {e}", seed.id)))?;
    }

    Ok(recipes)
}

/// Insert the sample recipes if the recipe table is empty.
///
/// The emptiness check and the inserts share one transaction.
///
/// # Errors
///
/// Returns `RepositoryError::Seed` if the embedded data is invalid.
/// Returns `RepositoryError::Database` if a query fails.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<SeedOutcome, RepositoryError> {
    let recipes = sample_recipes()?;
    let mut tx = super::begin_write(pool).await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM recipe")
        .fetch_one(&mut *tx)
        .await?;
    if existing > 0 {
        tracing::debug!(existing, "Recipe table not empty, skipping seed");
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    let count = insert_all(&mut tx, &recipes).await?;
    tx.commit().await?;

    tracing::info!(recipes = count, "Seeded sample recipes");
    Ok(SeedOutcome::Seeded(count))
}

/// Clear every table, then insert the sample recipes.
///
/// # Returns
///
/// The number of recipes inserted.
///
/// # Errors
///
/// Returns `RepositoryError::Seed` if the embedded data is invalid.
/// Returns `RepositoryError::Database` if a query fails.
pub async fn reset_and_seed(pool: &SqlitePool) -> Result<usize, RepositoryError> {
    let recipes = sample_recipes()?;
    let mut tx = super::begin_write(pool).await?;

    for table in RESET_ORDER {
        let result = sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?;
        tracing::info!(table, rows = result.rows_affected(), "Cleared table");
    }

    let count = insert_all(&mut tx, &recipes).await?;
    tx.commit().await?;

    tracing::info!(recipes = count, "Reset and seeded sample recipes");
    Ok(count)
}

async fn insert_all(
    conn: &mut SqliteConnection,
    recipes: &[SeedRecipe],
) -> Result<usize, RepositoryError> {
    for seed in recipes {
        insert_aggregate(conn, &seed.id, &seed.recipe).await?;
    }
    Ok(recipes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{RecipeRepository, create_in_memory_pool, run_migrations};

    async fn migrated_pool() -> SqlitePool {
        let pool = create_in_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[test]
    fn test_sample_recipes_parse() {
        let recipes = sample_recipes().unwrap();
        let ids: Vec<&str> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "seed-1",
                "seed-2",
                "seed-3",
                "seed-4",
                "seed-5",
                "seed-6",
                "seed-detailed-1"
            ]
        );

        let detailed = &recipes[6].recipe;
        assert_eq!(detailed.ingredients.len(), 8);
        assert_eq!(detailed.instructions.len(), 6);
        assert_eq!(detailed.nutrition_facts.len(), 1);
        assert_eq!(
            detailed.nutrition_facts[0].quantity,
            "450 calories, 25g protein, 60g carbs, 12g fat"
        );
        assert_eq!(detailed.cook_time, Some(30));
        assert!(recipes[0].recipe.description.is_none());
    }

    #[tokio::test]
    async fn test_seed_if_empty_runs_once() {
        let pool = migrated_pool().await;

        assert_eq!(seed_if_empty(&pool).await.unwrap(), SeedOutcome::Seeded(7));
        assert_eq!(
            seed_if_empty(&pool).await.unwrap(),
            SeedOutcome::AlreadyPopulated
        );

        let recipes = RecipeRepository::new(&pool).list().await.unwrap();
        assert_eq!(recipes.len(), 7);
        assert_eq!(recipes[0].tags, vec!["Thai", "Curry", "Rice"]);
    }

    #[tokio::test]
    async fn test_seed_shares_tags_by_name() {
        let pool = migrated_pool().await;
        seed_if_empty(&pool).await.unwrap();

        let thai: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tag WHERE name = 'Thai'")
            .fetch_one(&pool)
            .await
            .unwrap();
        let tags: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tag")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(thai, 1);
        // Distinct names across the sample set
        assert_eq!(tags, 13);
    }

    #[tokio::test]
    async fn test_reset_replaces_existing_data() {
        let pool = migrated_pool().await;
        seed_if_empty(&pool).await.unwrap();
        sqlx::query("INSERT INTO shopping_item (id, name, quantity) VALUES ('s1', 'Milk', '1')")
            .execute(&pool)
            .await
            .unwrap();
        RecipeRepository::new(&pool)
            .delete(&RecipeId::new("seed-1"))
            .await
            .unwrap();

        assert_eq!(reset_and_seed(&pool).await.unwrap(), 7);

        let repo = RecipeRepository::new(&pool);
        assert!(repo.exists(&RecipeId::new("seed-1")).await.unwrap());
        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shopping_item")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(items, 0);
    }
}
