//! Child records carried in recipe payloads.
//!
//! A draft is the plain, id-less form of an ingredient, instruction or
//! nutrition fact as a client sends it. Persisted rows pair a draft with
//! its ID; the reconciler decides which drafts become updates and which
//! become inserts.

use serde::{Deserialize, Serialize};

use crate::reconcile::NaturalKey;

/// An ingredient line, e.g. `{"name": "salt", "quantity": "1 tsp"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientDraft {
    /// Ingredient name; unique within one recipe.
    pub name: String,
    /// Free-text quantity ("1 cup", "1 (10 oz) bag").
    pub quantity: String,
}

/// A numbered preparation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionDraft {
    /// 1-based step number; unique within one recipe.
    pub step_number: i32,
    /// What to do in this step.
    pub description: String,
}

/// A named nutrition value, e.g. `{"name": "protein", "quantity": "25g"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutritionFactDraft {
    /// Nutrient name; unique within one recipe.
    pub name: String,
    /// Free-text amount.
    pub quantity: String,
}

impl NaturalKey for IngredientDraft {
    type Key = String;

    fn natural_key(&self) -> String {
        self.name.clone()
    }
}

impl NaturalKey for InstructionDraft {
    type Key = i32;

    fn natural_key(&self) -> i32 {
        self.step_number
    }
}

impl NaturalKey for NutritionFactDraft {
    type Key = String;

    fn natural_key(&self) -> String {
        self.name.clone()
    }
}
