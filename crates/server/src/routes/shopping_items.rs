//! Shopping list route handlers.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};

use recipe_box_core::ShoppingItemId;

use super::recipes::MessageResponse;
use crate::error::{AppError, Result, SHOPPING_ITEM_NOT_FOUND};
use crate::models::shopping_item::{
    CreateShoppingItemInput, ShoppingItem, UpdateShoppingItemInput,
};
use crate::state::AppState;

/// GET /shopping-items
///
/// # Errors
///
/// Returns `AppError::Database` if the store can't be read.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ShoppingItem>>> {
    Ok(Json(state.shopping_items().list().await?))
}

/// GET /shopping-items/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the item doesn't exist.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ShoppingItemId>,
) -> Result<Json<ShoppingItem>> {
    state
        .shopping_items()
        .get(&id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(SHOPPING_ITEM_NOT_FOUND))
}

/// POST /shopping-items
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if `name` or `quantity` is missing.
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ShoppingItem>)> {
    let input = CreateShoppingItemInput::from_slice(&body)?;
    let item = state.shopping_items().create(input.into_fields()).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /shopping-items/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the item doesn't exist.
/// Returns `AppError::InvalidInput` if the body is empty or malformed.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ShoppingItemId>,
    body: Bytes,
) -> Result<Json<ShoppingItem>> {
    let items = state.shopping_items();
    if items.get(&id).await?.is_none() {
        return Err(AppError::NotFound(SHOPPING_ITEM_NOT_FOUND));
    }

    let input = UpdateShoppingItemInput::from_slice(&body)?;
    let item = items
        .update(&id, input)
        .await
        .map_err(AppError::not_found_as(SHOPPING_ITEM_NOT_FOUND))?;

    Ok(Json(item))
}

/// DELETE /shopping-items/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the item doesn't exist.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<ShoppingItemId>,
) -> Result<Json<MessageResponse>> {
    state
        .shopping_items()
        .delete(&id)
        .await
        .map_err(AppError::not_found_as(SHOPPING_ITEM_NOT_FOUND))?;

    Ok(Json(MessageResponse {
        message: "Shopping item deleted",
    }))
}
