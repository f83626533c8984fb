//! Database operations for the recipe store.
//!
//! # Database: `SQLite`
//!
//! ## Tables
//!
//! - `recipe` - Recipe scalar fields
//! - `tag` - Shared tags, unique by name
//! - `recipe_tag` - Recipe to tag associations (ordered by `position`)
//! - `ingredient`, `instruction`, `nutrition_fact` - Children owned by a recipe
//! - `shopping_item` - Independent shopping list
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and are embedded into
//! the binary. The server applies them at startup; they can also be run via:
//! ```bash
//! cargo run -p recipe-box-cli -- migrate
//! ```

pub mod children;
pub mod recipes;
pub mod seed;
pub mod shopping_items;
pub mod tags;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::{Sqlite, SqlitePool, Transaction};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

pub use recipes::RecipeRepository;
pub use shopping_items::ShoppingItemRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying embedded migrations failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (duplicate natural key, unknown reference, range check).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// Seed data could not be loaded.
    #[error("seed error: {0}")]
    Seed(String),
}

/// Classify a write failure, surfacing store-level constraint violations as
/// `RepositoryError::Conflict`.
pub(crate) fn map_write_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && (db_err.is_unique_violation()
            || db_err.is_foreign_key_violation()
            || db_err.is_check_violation())
    {
        return RepositoryError::Conflict(db_err.message().to_owned());
    }
    RepositoryError::Database(e)
}

/// Begin a transaction that takes the write lock up front.
///
/// Every read-then-write path must start here. A deferred transaction whose
/// snapshot goes stale before its first write fails with `SQLITE_BUSY`, and
/// `busy_timeout` doesn't retry that case.
///
/// # Errors
///
/// Returns `sqlx::Error` if a connection can't be acquired or the lock isn't
/// granted within the busy timeout.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// Foreign keys are enforced on every connection and the database runs in
/// WAL mode so readers don't block the single writer.
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Create a pool over a private in-memory database.
///
/// The pool holds exactly one connection that never expires, because an
/// in-memory database lives only as long as its connection. Used by tests
/// and by throwaway local runs.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_in_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Apply the embedded schema migrations.
///
/// Safe to call on every startup; already-applied migrations are skipped.
///
/// # Errors
///
/// Returns `RepositoryError::Migration` if a migration fails or the
/// recorded migration history doesn't match the embedded files.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), RepositoryError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
