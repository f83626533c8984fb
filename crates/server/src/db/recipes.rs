//! Database operations for the recipe aggregate.
//!
//! A recipe row, its tag associations and its three child collections are
//! always written together inside one transaction. Deleting a recipe removes
//! its children and associations explicitly; tag rows are never removed.

use sqlx::{SqliteConnection, SqlitePool};

use recipe_box_core::{IngredientDraft, InstructionDraft, NutritionFactDraft, RecipeId};

use super::{RepositoryError, children, map_write_error, tags};
use crate::models::recipe::{
    CreateRecipeInput, RecipeDetail, RecipeFields, RecipeSummary, UpdateRecipeInput,
};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: RecipeId,
    title: String,
    description: Option<String>,
    category: String,
    image_url: Option<String>,
    prep_time: Option<i32>,
    cook_time: Option<i32>,
    servings: Option<i32>,
    difficulty: Option<String>,
}

impl RecipeRow {
    fn into_parts(self) -> (RecipeId, RecipeFields) {
        (
            self.id,
            RecipeFields {
                title: self.title,
                description: self.description,
                category: self.category,
                image_url: self.image_url,
                prep_time: self.prep_time,
                cook_time: self.cook_time,
                servings: self.servings,
                difficulty: self.difficulty,
            },
        )
    }
}

const SELECT_RECIPE: &str = r"
    SELECT id, title, description, category, image_url,
           prep_time, cook_time, servings, difficulty
    FROM recipe
";

// =============================================================================
// Repository
// =============================================================================

/// Repository for recipe aggregate operations.
pub struct RecipeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> RecipeRepository<'a> {
    /// Create a new recipe repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every recipe as a summary, in creation order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self) -> Result<Vec<RecipeSummary>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;

        let rows: Vec<RecipeRow> = sqlx::query_as(&format!("{SELECT_RECIPE} ORDER BY rowid"))
            .fetch_all(&mut *conn)
            .await?;
        let mut tags_by_recipe = tags::names_by_recipe(&mut conn).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let (id, fields) = row.into_parts();
                let tags = tags_by_recipe.remove(&id).unwrap_or_default();
                RecipeSummary::new(id, fields, tags)
            })
            .collect())
    }

    /// Get a recipe with its children.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: &RecipeId) -> Result<Option<RecipeDetail>, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        load_detail(&mut conn, id).await
    }

    /// Check whether a recipe exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: &RecipeId) -> Result<bool, RepositoryError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM recipe WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Create a recipe with its tags and children under a fresh ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a child list repeats a natural key.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, input: &CreateRecipeInput) -> Result<RecipeDetail, RepositoryError> {
        let id = RecipeId::generate();
        let mut tx = super::begin_write(self.pool).await?;

        insert_aggregate(&mut tx, &id, input).await?;
        let detail = load_detail(&mut tx, &id)
            .await?
            .ok_or_else(|| RepositoryError::DataCorruption(format!("recipe {id} vanished")))?;

        tx.commit().await?;

        tracing::info!(recipe_id = %id, title = %detail.summary.title, "Recipe created");
        Ok(detail)
    }

    /// Apply a partial update to a recipe.
    ///
    /// Scalars present in `input` overwrite the stored values. Tags present
    /// replace the associations. Each child list present is reconciled by
    /// natural key, so unchanged items keep their IDs.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the recipe doesn't exist.
    /// Returns `RepositoryError::Conflict` if a child list repeats a natural key.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: &RecipeId,
        input: UpdateRecipeInput,
    ) -> Result<RecipeDetail, RepositoryError> {
        let mut tx = super::begin_write(self.pool).await?;

        let row: RecipeRow = sqlx::query_as(&format!("{SELECT_RECIPE} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;
        let (_, mut fields) = row.into_parts();
        input.apply_scalars(&mut fields);

        sqlx::query(
            r"
            UPDATE recipe
            SET title = ?, description = ?, category = ?, image_url = ?,
                prep_time = ?, cook_time = ?, servings = ?, difficulty = ?
            WHERE id = ?
            ",
        )
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.category)
        .bind(&fields.image_url)
        .bind(fields.prep_time)
        .bind(fields.cook_time)
        .bind(fields.servings)
        .bind(&fields.difficulty)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        if let Some(names) = &input.tags {
            tags::replace_for_recipe(&mut tx, id, names).await?;
        }
        if let Some(ingredients) = input.ingredients {
            children::reconcile::<IngredientDraft>(&mut tx, id, ingredients).await?;
        }
        if let Some(instructions) = input.instructions {
            children::reconcile::<InstructionDraft>(&mut tx, id, instructions).await?;
        }
        if let Some(facts) = input.nutrition_facts {
            children::reconcile::<NutritionFactDraft>(&mut tx, id, facts).await?;
        }

        let detail = load_detail(&mut tx, id)
            .await?
            .ok_or_else(|| RepositoryError::DataCorruption(format!("recipe {id} vanished")))?;

        tx.commit().await?;

        tracing::info!(recipe_id = %id, "Recipe updated");
        Ok(detail)
    }

    /// Delete a recipe, its children and its tag associations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the recipe doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: &RecipeId) -> Result<(), RepositoryError> {
        let mut tx = super::begin_write(self.pool).await?;

        if !delete_aggregate(&mut tx, id).await? {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        tracing::info!(recipe_id = %id, "Recipe deleted");
        Ok(())
    }
}

// =============================================================================
// Aggregate Helpers
// =============================================================================

/// Insert a recipe row, its tags and its children under `id`.
///
/// Shared by `create` and the seeder; the caller owns the transaction.
pub(crate) async fn insert_aggregate(
    conn: &mut SqliteConnection,
    id: &RecipeId,
    input: &CreateRecipeInput,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO recipe
            (id, title, description, category, image_url,
             prep_time, cook_time, servings, difficulty)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.category)
    .bind(&input.image_url)
    .bind(input.prep_time)
    .bind(input.cook_time)
    .bind(input.servings)
    .bind(&input.difficulty)
    .execute(&mut *conn)
    .await
    .map_err(map_write_error)?;

    tags::replace_for_recipe(conn, id, &input.tags).await?;
    children::insert_all(conn, id, &input.ingredients).await?;
    children::insert_all(conn, id, &input.instructions).await?;
    children::insert_all(conn, id, &input.nutrition_facts).await?;

    Ok(())
}

/// Remove a recipe and everything it owns. Returns false if it didn't exist.
pub(crate) async fn delete_aggregate(
    conn: &mut SqliteConnection,
    id: &RecipeId,
) -> Result<bool, RepositoryError> {
    tags::clear_for_recipe(conn, id).await?;
    children::delete_all::<IngredientDraft>(conn, id).await?;
    children::delete_all::<InstructionDraft>(conn, id).await?;
    children::delete_all::<NutritionFactDraft>(conn, id).await?;

    let result = sqlx::query("DELETE FROM recipe WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

async fn load_detail(
    conn: &mut SqliteConnection,
    id: &RecipeId,
) -> Result<Option<RecipeDetail>, RepositoryError> {
    let row: Option<RecipeRow> = sqlx::query_as(&format!("{SELECT_RECIPE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };

    let (id, fields) = row.into_parts();
    let tags = tags::names_for_recipe(conn, &id).await?;
    let ingredients = children::load::<IngredientDraft>(conn, &id).await?;
    let instructions = children::load::<InstructionDraft>(conn, &id).await?;
    let nutrition_facts = children::load::<NutritionFactDraft>(conn, &id).await?;

    Ok(Some(RecipeDetail {
        summary: RecipeSummary::new(id, fields, tags),
        ingredients: ingredients.into_iter().map(Into::into).collect(),
        instructions: instructions.into_iter().map(Into::into).collect(),
        nutrition_facts: nutrition_facts.into_iter().map(Into::into).collect(),
    }))
}
