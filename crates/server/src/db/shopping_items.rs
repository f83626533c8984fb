//! Database operations for the shopping list.

use sqlx::SqlitePool;

use recipe_box_core::ShoppingItemId;

use super::{RepositoryError, map_write_error};
use crate::models::shopping_item::{ShoppingItem, ShoppingItemFields, UpdateShoppingItemInput};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ShoppingItemRow {
    id: ShoppingItemId,
    name: String,
    quantity: String,
    category: Option<String>,
    unit: Option<String>,
    is_checked: bool,
}

impl From<ShoppingItemRow> for ShoppingItem {
    fn from(row: ShoppingItemRow) -> Self {
        Self {
            id: row.id,
            fields: ShoppingItemFields {
                name: row.name,
                quantity: row.quantity,
                category: row.category,
                unit: row.unit,
                is_checked: row.is_checked,
            },
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for shopping list operations.
pub struct ShoppingItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShoppingItemRepository<'a> {
    /// Create a new shopping item repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every item in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ShoppingItem>, RepositoryError> {
        let rows: Vec<ShoppingItemRow> = sqlx::query_as(
            "SELECT id, name, quantity, category, unit, is_checked FROM shopping_item ORDER BY rowid",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: &ShoppingItemId) -> Result<Option<ShoppingItem>, RepositoryError> {
        let row: Option<ShoppingItemRow> = sqlx::query_as(
            "SELECT id, name, quantity, category, unit, is_checked FROM shopping_item WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create an item under a fresh ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, fields: ShoppingItemFields) -> Result<ShoppingItem, RepositoryError> {
        let id = ShoppingItemId::generate();

        sqlx::query(
            r"
            INSERT INTO shopping_item (id, name, quantity, category, unit, is_checked)
            VALUES (?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&id)
        .bind(&fields.name)
        .bind(&fields.quantity)
        .bind(&fields.category)
        .bind(&fields.unit)
        .bind(fields.is_checked)
        .execute(self.pool)
        .await
        .map_err(map_write_error)?;

        tracing::debug!(shopping_item_id = %id, "Shopping item created");
        Ok(ShoppingItem { id, fields })
    }

    /// Apply a partial update to an item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: &ShoppingItemId,
        input: UpdateShoppingItemInput,
    ) -> Result<ShoppingItem, RepositoryError> {
        let mut tx = super::begin_write(self.pool).await?;

        let row: ShoppingItemRow = sqlx::query_as(
            "SELECT id, name, quantity, category, unit, is_checked FROM shopping_item WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let mut item = ShoppingItem::from(row);
        input.apply(&mut item.fields);

        sqlx::query(
            r"
            UPDATE shopping_item
            SET name = ?, quantity = ?, category = ?, unit = ?, is_checked = ?
            WHERE id = ?
            ",
        )
        .bind(&item.fields.name)
        .bind(&item.fields.quantity)
        .bind(&item.fields.category)
        .bind(&item.fields.unit)
        .bind(item.fields.is_checked)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        tx.commit().await?;
        Ok(item)
    }

    /// Delete an item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: &ShoppingItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shopping_item WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
