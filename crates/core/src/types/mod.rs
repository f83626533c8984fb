//! Core types for Recipe Box.
//!
//! This module provides type-safe wrappers for entity IDs and the plain
//! records that make up a recipe aggregate.

pub mod id;
pub mod recipe;

pub use id::*;
pub use recipe::{IngredientDraft, InstructionDraft, NutritionFactDraft};
