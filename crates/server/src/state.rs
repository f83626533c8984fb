//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ServerConfig;
use crate::db::{RecipeRepository, ShoppingItemRepository};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Repositories are built on demand from the
/// shared pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    pool: SqlitePool,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: ServerConfig, pool: SqlitePool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, pool }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Recipe aggregate repository.
    #[must_use]
    pub fn recipes(&self) -> RecipeRepository<'_> {
        RecipeRepository::new(&self.inner.pool)
    }

    /// Shopping list repository.
    #[must_use]
    pub fn shopping_items(&self) -> ShoppingItemRepository<'_> {
        ShoppingItemRepository::new(&self.inner.pool)
    }
}
