//! Storage for a recipe's owned child collections.
//!
//! Ingredients, instructions and nutrition facts share one shape: an ID, the
//! owning recipe, and a draft's content columns. [`ChildTable`] describes how
//! each kind maps onto its table; the generic functions below load, insert,
//! reconcile and delete any kind through one code path.
//!
//! Every function takes a `&mut SqliteConnection` so callers can run it on a
//! transaction that also covers the recipe row and its tags.

use sqlx::sqlite::SqliteRow;
use sqlx::{Decode, Encode, Row, Sqlite, SqliteConnection, Type};

use recipe_box_core::{
    IngredientDraft, IngredientId, InstructionDraft, InstructionId, NaturalKey,
    NutritionFactDraft, NutritionFactId, RecipeId, plan_reconciliation,
};

use super::{RepositoryError, map_write_error};

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, <Sqlite as sqlx::Database>::Arguments<'q>>;

/// How a child draft kind is stored.
///
/// Content columns are bound by [`ChildTable::bind_content`] in the order
/// they appear in `INSERT` (after `id, recipe_id`) and `UPDATE` (before the
/// trailing `id`).
pub trait ChildTable: NaturalKey + PartialEq + Send + Sync + Sized + 'static {
    /// Row ID type.
    type Id: Send
        + Sync
        + std::fmt::Display
        + Type<Sqlite>
        + for<'q> Encode<'q, Sqlite>
        + for<'r> Decode<'r, Sqlite>
        + 'static;

    /// Table name, for logging.
    const TABLE: &'static str;
    /// `SELECT id, <content> ... WHERE recipe_id = ?`
    const SELECT_BY_RECIPE: &'static str;
    /// `INSERT ... (id, recipe_id, <content>)`
    const INSERT: &'static str;
    /// `UPDATE ... SET <content> WHERE id = ?`
    const UPDATE: &'static str;
    /// `DELETE ... WHERE id = ?`
    const DELETE: &'static str;
    /// `DELETE ... WHERE recipe_id = ?`
    const DELETE_BY_RECIPE: &'static str;

    /// Fresh ID for an inserted row.
    fn generate_id() -> Self::Id;

    /// Decode a row selected by `SELECT_BY_RECIPE`.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if a column is missing or has the wrong type.
    fn from_row(row: &SqliteRow) -> Result<(Self::Id, Self), sqlx::Error>;

    /// Bind the content columns.
    fn bind_content<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q>;
}

impl ChildTable for IngredientDraft {
    type Id = IngredientId;

    const TABLE: &'static str = "ingredient";
    const SELECT_BY_RECIPE: &'static str =
        "SELECT id, name, quantity FROM ingredient WHERE recipe_id = ? ORDER BY rowid";
    const INSERT: &'static str =
        "INSERT INTO ingredient (id, recipe_id, name, quantity) VALUES (?, ?, ?, ?)";
    const UPDATE: &'static str = "UPDATE ingredient SET name = ?, quantity = ? WHERE id = ?";
    const DELETE: &'static str = "DELETE FROM ingredient WHERE id = ?";
    const DELETE_BY_RECIPE: &'static str = "DELETE FROM ingredient WHERE recipe_id = ?";

    fn generate_id() -> IngredientId {
        IngredientId::generate()
    }

    fn from_row(row: &SqliteRow) -> Result<(IngredientId, Self), sqlx::Error> {
        Ok((
            row.try_get("id")?,
            Self {
                name: row.try_get("name")?,
                quantity: row.try_get("quantity")?,
            },
        ))
    }

    fn bind_content<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.name.as_str()).bind(self.quantity.as_str())
    }
}

impl ChildTable for InstructionDraft {
    type Id = InstructionId;

    const TABLE: &'static str = "instruction";
    const SELECT_BY_RECIPE: &'static str =
        "SELECT id, step_number, description FROM instruction WHERE recipe_id = ? ORDER BY step_number";
    const INSERT: &'static str =
        "INSERT INTO instruction (id, recipe_id, step_number, description) VALUES (?, ?, ?, ?)";
    const UPDATE: &'static str =
        "UPDATE instruction SET step_number = ?, description = ? WHERE id = ?";
    const DELETE: &'static str = "DELETE FROM instruction WHERE id = ?";
    const DELETE_BY_RECIPE: &'static str = "DELETE FROM instruction WHERE recipe_id = ?";

    fn generate_id() -> InstructionId {
        InstructionId::generate()
    }

    fn from_row(row: &SqliteRow) -> Result<(InstructionId, Self), sqlx::Error> {
        Ok((
            row.try_get("id")?,
            Self {
                step_number: row.try_get("step_number")?,
                description: row.try_get("description")?,
            },
        ))
    }

    fn bind_content<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.step_number).bind(self.description.as_str())
    }
}

impl ChildTable for NutritionFactDraft {
    type Id = NutritionFactId;

    const TABLE: &'static str = "nutrition_fact";
    const SELECT_BY_RECIPE: &'static str =
        "SELECT id, name, quantity FROM nutrition_fact WHERE recipe_id = ? ORDER BY rowid";
    const INSERT: &'static str =
        "INSERT INTO nutrition_fact (id, recipe_id, name, quantity) VALUES (?, ?, ?, ?)";
    const UPDATE: &'static str = "UPDATE nutrition_fact SET name = ?, quantity = ? WHERE id = ?";
    const DELETE: &'static str = "DELETE FROM nutrition_fact WHERE id = ?";
    const DELETE_BY_RECIPE: &'static str = "DELETE FROM nutrition_fact WHERE recipe_id = ?";

    fn generate_id() -> NutritionFactId {
        NutritionFactId::generate()
    }

    fn from_row(row: &SqliteRow) -> Result<(NutritionFactId, Self), sqlx::Error> {
        Ok((
            row.try_get("id")?,
            Self {
                name: row.try_get("name")?,
                quantity: row.try_get("quantity")?,
            },
        ))
    }

    fn bind_content<'q>(&'q self, query: SqliteQuery<'q>) -> SqliteQuery<'q> {
        query.bind(self.name.as_str()).bind(self.quantity.as_str())
    }
}

/// Row counts from one reconciliation, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub deleted: usize,
}

/// Load every child of one kind owned by a recipe.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn load<C: ChildTable>(
    conn: &mut SqliteConnection,
    recipe_id: &RecipeId,
) -> Result<Vec<(C::Id, C)>, RepositoryError> {
    let rows = sqlx::query(C::SELECT_BY_RECIPE)
        .bind(recipe_id)
        .fetch_all(&mut *conn)
        .await?;

    let children = rows
        .iter()
        .map(C::from_row)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(children)
}

/// Insert children for a recipe that has none yet.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if two items share a natural key.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn insert_all<C: ChildTable>(
    conn: &mut SqliteConnection,
    recipe_id: &RecipeId,
    items: &[C],
) -> Result<usize, RepositoryError> {
    for item in items {
        insert_one(conn, recipe_id, item).await?;
    }
    Ok(items.len())
}

/// Make a recipe's children of one kind match `incoming`.
///
/// Rows are matched to incoming items by natural key so unchanged items
/// keep their IDs. Writes are applied as deletes, then updates, then
/// inserts, so natural-key indexes only see the final set.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the incoming list repeats a natural key.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn reconcile<C: ChildTable>(
    conn: &mut SqliteConnection,
    recipe_id: &RecipeId,
    incoming: Vec<C>,
) -> Result<ReconcileSummary, RepositoryError> {
    let existing = load::<C>(conn, recipe_id).await?;
    let plan = plan_reconciliation(existing, incoming);

    for id in &plan.deletes {
        sqlx::query(C::DELETE).bind(id).execute(&mut *conn).await?;
    }

    for (id, item) in &plan.updates {
        item.bind_content(sqlx::query(C::UPDATE))
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(map_write_error)?;
    }

    for item in &plan.inserts {
        insert_one(conn, recipe_id, item).await?;
    }

    let summary = ReconcileSummary {
        inserted: plan.inserts.len(),
        updated: plan.updates.len(),
        unchanged: plan.unchanged.len(),
        deleted: plan.deletes.len(),
    };

    tracing::debug!(
        table = C::TABLE,
        recipe_id = %recipe_id,
        inserted = summary.inserted,
        updated = summary.updated,
        unchanged = summary.unchanged,
        deleted = summary.deleted,
        "Reconciled child collection"
    );

    Ok(summary)
}

/// Delete every child of one kind owned by a recipe.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn delete_all<C: ChildTable>(
    conn: &mut SqliteConnection,
    recipe_id: &RecipeId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query(C::DELETE_BY_RECIPE)
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

async fn insert_one<C: ChildTable>(
    conn: &mut SqliteConnection,
    recipe_id: &RecipeId,
    item: &C,
) -> Result<(), RepositoryError> {
    let id = C::generate_id();
    item.bind_content(sqlx::query(C::INSERT).bind(&id).bind(recipe_id))
        .execute(&mut *conn)
        .await
        .map_err(map_write_error)?;
    Ok(())
}
