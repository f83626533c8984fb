//! Shopping list items.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use recipe_box_core::ShoppingItemId;

use super::{InputError, non_blank, nullable, object_from_slice, required_if_present};

/// A shopping list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub id: ShoppingItemId,
    #[serde(flatten)]
    pub fields: ShoppingItemFields,
}

/// The stored columns of a shopping item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItemFields {
    pub name: String,
    /// Free-text amount.
    pub quantity: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub is_checked: bool,
}

/// Body of `POST /shopping-items`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShoppingItemInput {
    pub name: String,
    pub quantity: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub is_checked: Option<bool>,
}

impl CreateShoppingItemInput {
    /// Parse and validate a create body.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the body is malformed, lacks `name` or
    /// `quantity`, or has a blank name.
    pub fn from_slice(body: &[u8]) -> Result<Self, InputError> {
        let object = object_from_slice(body)?;
        for field in ["name", "quantity"] {
            if !object.contains_key(field) {
                return Err(InputError::MissingField(field));
            }
        }

        let input: Self = serde_json::from_value(Value::Object(object))?;
        non_blank("name", &input.name)?;
        Ok(input)
    }

    /// Stored columns for the new item; `isChecked` defaults to false.
    #[must_use]
    pub fn into_fields(self) -> ShoppingItemFields {
        ShoppingItemFields {
            name: self.name,
            quantity: self.quantity,
            category: self.category,
            unit: self.unit,
            is_checked: self.is_checked.unwrap_or(false),
        }
    }
}

/// Body of `PUT /shopping-items/{id}`; same tri-state rules as recipes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShoppingItemInput {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub quantity: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub unit: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub is_checked: Option<Option<bool>>,
}

impl UpdateShoppingItemInput {
    /// Parse and validate an update body.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the body is malformed or empty, or clears a
    /// required field.
    pub fn from_slice(body: &[u8]) -> Result<Self, InputError> {
        let object = object_from_slice(body)?;
        if object.is_empty() {
            return Err(InputError::Empty);
        }

        let input: Self = serde_json::from_value(Value::Object(object))?;
        if let Some(name) = required_if_present("name", input.name.clone())? {
            non_blank("name", &name)?;
        }
        required_if_present("quantity", input.quantity.clone())?;
        required_if_present("isChecked", input.is_checked)?;
        Ok(input)
    }

    /// Overwrite the columns this update carries.
    pub fn apply(self, fields: &mut ShoppingItemFields) {
        if let Some(Some(name)) = self.name {
            fields.name = name;
        }
        if let Some(Some(quantity)) = self.quantity {
            fields.quantity = quantity;
        }
        if let Some(category) = self.category {
            fields.category = category;
        }
        if let Some(unit) = self.unit {
            fields.unit = unit;
        }
        if let Some(Some(is_checked)) = self.is_checked {
            fields.is_checked = is_checked;
        }
    }
}
