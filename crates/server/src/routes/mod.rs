//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Recipes
//! GET    /recipes                - Recipe summaries
//! POST   /recipes                - Create recipe (201)
//! GET    /recipes/{id}           - Recipe detail with children
//! PUT    /recipes/{id}           - Partial update, reconciling child lists
//! DELETE /recipes/{id}           - Delete recipe and its children
//!
//! # Shopping list
//! GET    /shopping-items         - All items
//! POST   /shopping-items         - Create item (201)
//! GET    /shopping-items/{id}    - One item
//! PUT    /shopping-items/{id}    - Partial update
//! DELETE /shopping-items/{id}    - Delete item
//! ```
//!
//! The same tree is mounted at the root and under `/api`.

pub mod recipes;
pub mod shopping_items;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the recipe routes router.
pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(recipes::index).post(recipes::create))
        .route(
            "/{id}",
            get(recipes::show)
                .put(recipes::update)
                .delete(recipes::destroy),
        )
}

/// Create the shopping list routes router.
pub fn shopping_item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(shopping_items::index).post(shopping_items::create))
        .route(
            "/{id}",
            get(shopping_items::show)
                .put(shopping_items::update)
                .delete(shopping_items::destroy),
        )
}

/// Build the API router (without the `/api` mount).
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/recipes", recipe_routes())
        .nest("/shopping-items", shopping_item_routes())
}
