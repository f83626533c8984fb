//! Tag lookup and recipe-tag associations.
//!
//! Tags are shared by name across recipes. Resolving a name reuses the
//! existing row or creates one on first use; nothing here ever deletes a
//! tag row, even one that no recipe references any more.

use std::collections::{HashMap, HashSet};

use sqlx::SqliteConnection;

use recipe_box_core::{RecipeId, TagId};

use super::{RepositoryError, map_write_error};

/// Find the tag with `name`, creating it if it doesn't exist.
///
/// Creation is `INSERT ... ON CONFLICT DO NOTHING` followed by a lookup, so
/// an existing tag (or one created concurrently) is reused instead of
/// tripping the unique index.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if a query fails.
pub async fn resolve(conn: &mut SqliteConnection, name: &str) -> Result<TagId, RepositoryError> {
    sqlx::query("INSERT INTO tag (id, name) VALUES (?, ?) ON CONFLICT (name) DO NOTHING")
        .bind(TagId::generate())
        .bind(name)
        .execute(&mut *conn)
        .await
        .map_err(map_write_error)?;

    let id: TagId = sqlx::query_scalar("SELECT id FROM tag WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    Ok(id)
}

/// Replace a recipe's tag associations with exactly `names`, in order.
///
/// Repeated names collapse to their first occurrence. Applying the same
/// list twice leaves the same associations.
///
/// # Returns
///
/// The associated tag names, in association order.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if a store constraint is violated.
/// Returns `RepositoryError::Database` for other database errors.
pub async fn replace_for_recipe(
    conn: &mut SqliteConnection,
    recipe_id: &RecipeId,
    names: &[String],
) -> Result<Vec<String>, RepositoryError> {
    let mut seen = HashSet::with_capacity(names.len());
    let unique: Vec<&String> = names.iter().filter(|name| seen.insert(*name)).collect();

    clear_for_recipe(conn, recipe_id).await?;

    for (position, name) in unique.iter().enumerate() {
        let tag_id = resolve(conn, name).await?;
        sqlx::query("INSERT INTO recipe_tag (recipe_id, tag_id, position) VALUES (?, ?, ?)")
            .bind(recipe_id)
            .bind(&tag_id)
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .execute(&mut *conn)
            .await
            .map_err(map_write_error)?;
    }

    Ok(unique.into_iter().cloned().collect())
}

/// Remove all of a recipe's tag associations. Tag rows are kept.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn clear_for_recipe(
    conn: &mut SqliteConnection,
    recipe_id: &RecipeId,
) -> Result<u64, RepositoryError> {
    let result = sqlx::query("DELETE FROM recipe_tag WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Tag names for one recipe, in association order.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn names_for_recipe(
    conn: &mut SqliteConnection,
    recipe_id: &RecipeId,
) -> Result<Vec<String>, RepositoryError> {
    let names = sqlx::query_scalar(
        r"
        SELECT t.name
        FROM recipe_tag rt
        JOIN tag t ON t.id = rt.tag_id
        WHERE rt.recipe_id = ?
        ORDER BY rt.position
        ",
    )
    .bind(recipe_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(names)
}

/// Tag names for every recipe that has any, keyed by recipe.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the query fails.
pub async fn names_by_recipe(
    conn: &mut SqliteConnection,
) -> Result<HashMap<RecipeId, Vec<String>>, RepositoryError> {
    let rows: Vec<(RecipeId, String)> = sqlx::query_as(
        r"
        SELECT rt.recipe_id, t.name
        FROM recipe_tag rt
        JOIN tag t ON t.id = rt.tag_id
        ORDER BY rt.recipe_id, rt.position
        ",
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut by_recipe: HashMap<RecipeId, Vec<String>> = HashMap::new();
    for (recipe_id, name) in rows {
        by_recipe.entry(recipe_id).or_default().push(name);
    }

    Ok(by_recipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_in_memory_pool, run_migrations};

    async fn insert_recipe(conn: &mut SqliteConnection, id: &str) -> RecipeId {
        let id = RecipeId::new(id);
        sqlx::query("INSERT INTO recipe (id, title, category) VALUES (?, 'Test', 'Test')")
            .bind(&id)
            .execute(&mut *conn)
            .await
            .unwrap();
        id
    }

    async fn tag_count(conn: &mut SqliteConnection) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM tag")
            .fetch_one(&mut *conn)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_reuses_existing_tag() {
        let pool = create_in_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let first = resolve(&mut conn, "Thai").await.unwrap();
        let second = resolve(&mut conn, "Thai").await.unwrap();
        let other = resolve(&mut conn, "thai").await.unwrap();

        assert_eq!(first, second);
        assert_ne!(first, other, "tag names are case-sensitive");
        assert_eq!(tag_count(&mut conn).await, 2);
    }

    #[tokio::test]
    async fn test_replace_is_idempotent_and_ordered() {
        let pool = create_in_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let recipe_id = insert_recipe(&mut conn, "r1").await;

        let names = vec!["Rice".to_owned(), "Thai".to_owned(), "Rice".to_owned()];
        let first = replace_for_recipe(&mut conn, &recipe_id, &names).await.unwrap();
        let second = replace_for_recipe(&mut conn, &recipe_id, &names).await.unwrap();

        assert_eq!(first, vec!["Rice", "Thai"]);
        assert_eq!(first, second);
        assert_eq!(
            names_for_recipe(&mut conn, &recipe_id).await.unwrap(),
            vec!["Rice", "Thai"]
        );
        assert_eq!(tag_count(&mut conn).await, 2);
    }

    #[tokio::test]
    async fn test_clearing_keeps_tag_rows() {
        let pool = create_in_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let recipe_id = insert_recipe(&mut conn, "r1").await;

        replace_for_recipe(&mut conn, &recipe_id, &["Quick".to_owned()])
            .await
            .unwrap();
        replace_for_recipe(&mut conn, &recipe_id, &[]).await.unwrap();

        assert!(names_for_recipe(&mut conn, &recipe_id).await.unwrap().is_empty());
        assert_eq!(tag_count(&mut conn).await, 1);
    }

    #[tokio::test]
    async fn test_names_by_recipe_groups_rows() {
        let pool = create_in_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        let a = insert_recipe(&mut conn, "a").await;
        let b = insert_recipe(&mut conn, "b").await;

        replace_for_recipe(&mut conn, &a, &["Healthy".to_owned(), "Quick".to_owned()])
            .await
            .unwrap();
        replace_for_recipe(&mut conn, &b, &["Healthy".to_owned()])
            .await
            .unwrap();

        let grouped = names_by_recipe(&mut conn).await.unwrap();
        assert_eq!(grouped[&a], vec!["Healthy", "Quick"]);
        assert_eq!(grouped[&b], vec!["Healthy"]);
        assert_eq!(tag_count(&mut conn).await, 2);
    }
}
