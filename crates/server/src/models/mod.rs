//! Request and response models for the recipe API.
//!
//! Views are what handlers serialise; inputs are parsed from raw request
//! bodies so that missing keys, explicit `null`s and malformed JSON can be
//! told apart before anything touches the store.

pub mod recipe;
pub mod shopping_item;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

pub use recipe::{
    CreateRecipeInput, IngredientView, InstructionView, NutritionFactView, RecipeDetail,
    RecipeFields, RecipeSummary, UpdateRecipeInput,
};
pub use shopping_item::{
    CreateShoppingItemInput, ShoppingItem, ShoppingItemFields, UpdateShoppingItemInput,
};

/// Why a request body was rejected.
#[derive(Debug, Error)]
pub enum InputError {
    /// Body is not JSON, or a field has the wrong type.
    #[error("malformed body: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Body parsed but is not a JSON object.
    #[error("body must be a JSON object")]
    NotAnObject,

    /// Update body has no fields.
    #[error("body must not be empty")]
    Empty,

    /// A required key is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A key that cannot be cleared was sent as `null`.
    #[error("`{0}` must not be null")]
    NullField(&'static str),

    /// A value is out of range or blank.
    #[error("`{field}` {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

/// Parse a request body into a JSON object.
pub(crate) fn object_from_slice(body: &[u8]) -> Result<Map<String, Value>, InputError> {
    match serde_json::from_slice(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(InputError::NotAnObject),
    }
}

/// Deserialize a field that distinguishes "absent" from "explicitly null".
///
/// Use with `#[serde(default)]`: an absent key stays `None`, `null` becomes
/// `Some(None)` and a value becomes `Some(Some(v))`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Resolve a tri-state field that may not be cleared.
pub(crate) fn required_if_present<T>(
    field: &'static str,
    value: Option<Option<T>>,
) -> Result<Option<T>, InputError> {
    match value {
        None => Ok(None),
        Some(None) => Err(InputError::NullField(field)),
        Some(Some(v)) => Ok(Some(v)),
    }
}

pub(crate) fn non_blank(field: &'static str, value: &str) -> Result<(), InputError> {
    if value.trim().is_empty() {
        return Err(InputError::InvalidValue {
            field,
            reason: "must not be empty",
        });
    }
    Ok(())
}

pub(crate) fn non_negative(field: &'static str, value: Option<i32>) -> Result<(), InputError> {
    match value {
        Some(v) if v < 0 => Err(InputError::InvalidValue {
            field,
            reason: "must not be negative",
        }),
        _ => Ok(()),
    }
}

pub(crate) fn positive(field: &'static str, value: Option<i32>) -> Result<(), InputError> {
    match value {
        Some(v) if v <= 0 => Err(InputError::InvalidValue {
            field,
            reason: "must be greater than zero",
        }),
        _ => Ok(()),
    }
}
