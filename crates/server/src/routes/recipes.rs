//! Recipe route handlers.
//!
//! Bodies are taken as raw bytes and parsed by the input models, so a
//! missing key, an explicit `null` and malformed JSON all surface as
//! `400 Invalid input` with a specific `detail`.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use recipe_box_core::RecipeId;

use crate::error::{AppError, RECIPE_NOT_FOUND, Result};
use crate::models::recipe::{CreateRecipeInput, RecipeDetail, RecipeSummary, UpdateRecipeInput};
use crate::state::AppState;

/// Confirmation body for deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// List all recipes.
///
/// GET /recipes
///
/// # Errors
///
/// Returns `AppError::Database` if the store can't be read.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<RecipeSummary>>> {
    let recipes = state.recipes().list().await?;
    Ok(Json(recipes))
}

/// Show one recipe with its ingredients, instructions and nutrition facts.
///
/// GET /recipes/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the recipe doesn't exist.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<Json<RecipeDetail>> {
    state
        .recipes()
        .get(&id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound(RECIPE_NOT_FOUND))
}

/// Create a recipe.
///
/// POST /recipes
///
/// # Errors
///
/// Returns `AppError::InvalidInput` if a required key is missing or a value
/// is out of range. Returns a 409 if a child list repeats a natural key.
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<RecipeDetail>)> {
    let input = CreateRecipeInput::from_slice(&body)?;
    let recipe = state.recipes().create(&input).await?;
    Ok((StatusCode::CREATED, Json(recipe)))
}

/// Partially update a recipe, reconciling any child lists sent.
///
/// PUT /recipes/{id}
///
/// Existence is checked before the body is parsed, so an unknown ID is a
/// 404 even when the body is also invalid.
///
/// # Errors
///
/// Returns `AppError::NotFound` if the recipe doesn't exist.
/// Returns `AppError::InvalidInput` if the body is empty or malformed.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
    body: Bytes,
) -> Result<Json<RecipeDetail>> {
    let recipes = state.recipes();
    if !recipes.exists(&id).await? {
        return Err(AppError::NotFound(RECIPE_NOT_FOUND));
    }

    let input = UpdateRecipeInput::from_slice(&body)?;
    let recipe = recipes
        .update(&id, input)
        .await
        .map_err(AppError::not_found_as(RECIPE_NOT_FOUND))?;

    Ok(Json(recipe))
}

/// Delete a recipe and everything it owns. Shared tags are kept.
///
/// DELETE /recipes/{id}
///
/// # Errors
///
/// Returns `AppError::NotFound` if the recipe doesn't exist.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<RecipeId>,
) -> Result<Json<MessageResponse>> {
    state
        .recipes()
        .delete(&id)
        .await
        .map_err(AppError::not_found_as(RECIPE_NOT_FOUND))?;

    Ok(Json(MessageResponse {
        message: "Recipe deleted",
    }))
}
