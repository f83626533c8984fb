//! Integration tests for Recipe Box.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p recipe-box-integration-tests
//! ```
//!
//! Each test builds its own [`TestContext`]: a private `SQLite` store with
//! migrations applied, and the full application router driven in-process
//! through `tower::ServiceExt::oneshot`. No server or external database is
//! needed.
//!
//! [`TestContext::new`] uses a single-connection in-memory store, which
//! serializes every request. Tests that exercise concurrent writers use
//! [`TestContext::file_backed`], a pooled database file in a temp dir opened
//! the same way the server opens its store.
//!
//! # Test Categories
//!
//! - `recipes_api` - Recipe CRUD and child reconciliation over HTTP
//! - `shopping_items_api` - Shopping list CRUD
//! - `seed` - Startup seeding and the seeded catalogue

#![allow(clippy::missing_panics_doc)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tower::ServiceExt;

use recipe_box_server::config::ServerConfig;
use recipe_box_server::db::{self, seed};
use recipe_box_server::state::AppState;

/// A fresh store plus the router serving it.
pub struct TestContext {
    pub pool: SqlitePool,
    app: Router,
    // Keeps a file-backed store alive until the context drops.
    _dir: Option<TempDir>,
}

/// Status and decoded body of one response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// JSON body, a JSON string for plain-text bodies, or `null` if empty.
    pub body: Value,
}

impl TestContext {
    /// Empty store with the schema applied.
    pub async fn new() -> Self {
        let pool = db::create_in_memory_pool()
            .await
            .expect("Failed to open in-memory database");
        let config =
            ServerConfig::from_lookup(|_| None).expect("Default configuration must be valid");

        Self::with_pool(config, pool, None).await
    }

    /// Empty store in a database file, using the server's pool settings.
    pub async fn file_backed() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("recipes.db").display());

        let config = ServerConfig::from_lookup(|key| {
            (key == "RECIPES_DATABASE_URL").then(|| url.clone())
        })
        .expect("Test configuration must be valid");
        let pool = db::create_pool(&config.database_url)
            .await
            .expect("Failed to open database file");

        Self::with_pool(config, pool, Some(dir)).await
    }

    async fn with_pool(config: ServerConfig, pool: SqlitePool, dir: Option<TempDir>) -> Self {
        db::run_migrations(&pool)
            .await
            .expect("Failed to apply migrations");
        let app = recipe_box_server::app(AppState::new(config, pool.clone()));

        Self {
            pool,
            app,
            _dir: dir,
        }
    }

    /// Store populated with the sample recipes.
    pub async fn seeded() -> Self {
        let ctx = Self::new().await;
        seed::seed_if_empty(&ctx.pool)
            .await
            .expect("Failed to seed sample recipes");
        ctx
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, Body::empty()).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(Method::POST, uri, Body::from(body.to_string()))
            .await
    }

    pub async fn put(&self, uri: &str, body: &Value) -> TestResponse {
        self.send(Method::PUT, uri, Body::from(body.to_string()))
            .await
    }

    pub async fn put_raw(&self, uri: &str, body: &'static str) -> TestResponse {
        self.send(Method::PUT, uri, Body::from(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Body::empty()).await
    }

    /// Execute one request against the router.
    pub async fn send(&self, method: Method, uri: &str, body: Body) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .expect("Failed to build request");

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }

    /// Count rows in `table` matching `recipe_id`.
    pub async fn count_for_recipe(&self, table: &str, recipe_id: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE recipe_id = ?"))
            .bind(recipe_id)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }

    /// Count rows in `table`.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }
}

/// A complete create body with one ingredient and two steps.
#[must_use]
pub fn recipe_body(title: &str, tags: &[&str]) -> Value {
    serde_json::json!({
        "title": title,
        "description": "A test recipe",
        "category": "Dinner",
        "tags": tags,
        "imageUrl": null,
        "prepTime": 10,
        "cookTime": 20,
        "servings": 2,
        "difficulty": "easy",
        "ingredients": [{"name": "salt", "quantity": "1 tsp"}],
        "nutritionFacts": [{"name": "calories", "quantity": "200"}],
        "instructions": [
            {"stepNumber": 1, "description": "Boil water"},
            {"stepNumber": 2, "description": "Add pasta"}
        ]
    })
}
