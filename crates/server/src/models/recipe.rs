//! Recipe views and inputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use recipe_box_core::{
    IngredientDraft, IngredientId, InstructionDraft, InstructionId, NutritionFactDraft,
    NutritionFactId, RecipeId,
};

use super::{
    InputError, non_blank, non_negative, nullable, object_from_slice, positive,
    required_if_present,
};

/// Keys a create body must carry, even if their value is `null`.
const REQUIRED_FIELDS: [&str; 12] = [
    "title",
    "description",
    "category",
    "tags",
    "imageUrl",
    "prepTime",
    "cookTime",
    "servings",
    "difficulty",
    "ingredients",
    "nutritionFacts",
    "instructions",
];

/// Accepted spelling of `nutritionFacts` from older clients.
const NUTRITION_FACTS_ALIAS: &str = "nutrition_facts";

// =============================================================================
// Views
// =============================================================================

/// The scalar columns of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFields {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub image_url: Option<String>,
    /// Minutes.
    pub prep_time: Option<i32>,
    /// Minutes.
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    /// Free-text label such as "Easy" or "Medium".
    pub difficulty: Option<String>,
}

/// A recipe as listed by `GET /recipes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    /// Tag names in association order.
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<String>,
}

impl RecipeSummary {
    /// Assemble a summary from stored columns and tag names.
    #[must_use]
    pub fn new(id: RecipeId, fields: RecipeFields, tags: Vec<String>) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            category: fields.category,
            tags,
            image_url: fields.image_url,
            prep_time: fields.prep_time,
            cook_time: fields.cook_time,
            servings: fields.servings,
            difficulty: fields.difficulty,
        }
    }
}

/// A recipe with its child collections, as returned by single-recipe routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub ingredients: Vec<IngredientView>,
    pub instructions: Vec<InstructionView>,
    pub nutrition_facts: Vec<NutritionFactView>,
}

/// A persisted ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientView {
    pub id: IngredientId,
    pub name: String,
    pub quantity: String,
}

impl From<(IngredientId, IngredientDraft)> for IngredientView {
    fn from((id, draft): (IngredientId, IngredientDraft)) -> Self {
        Self {
            id,
            name: draft.name,
            quantity: draft.quantity,
        }
    }
}

/// A persisted instruction step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionView {
    pub id: InstructionId,
    pub step_number: i32,
    pub description: String,
}

impl From<(InstructionId, InstructionDraft)> for InstructionView {
    fn from((id, draft): (InstructionId, InstructionDraft)) -> Self {
        Self {
            id,
            step_number: draft.step_number,
            description: draft.description,
        }
    }
}

/// A persisted nutrition fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NutritionFactView {
    pub id: NutritionFactId,
    pub name: String,
    pub quantity: String,
}

impl From<(NutritionFactId, NutritionFactDraft)> for NutritionFactView {
    fn from((id, draft): (NutritionFactId, NutritionFactDraft)) -> Self {
        Self {
            id,
            name: draft.name,
            quantity: draft.quantity,
        }
    }
}

// =============================================================================
// Inputs
// =============================================================================

/// Body of `POST /recipes`. Also the shape of each embedded seed recipe.
///
/// Collections default to empty when deserialized directly; request bodies
/// go through [`CreateRecipeInput::from_slice`], which requires every key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipeInput {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<IngredientDraft>,
    #[serde(default, alias = "nutrition_facts")]
    pub nutrition_facts: Vec<NutritionFactDraft>,
    #[serde(default)]
    pub instructions: Vec<InstructionDraft>,
}

impl CreateRecipeInput {
    /// Parse and validate a create body.
    ///
    /// Every key in the create field set must be present; nullable scalars
    /// may carry `null`.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the body is malformed, misses a key, or
    /// fails validation.
    pub fn from_slice(body: &[u8]) -> Result<Self, InputError> {
        let object = object_from_slice(body)?;

        for field in REQUIRED_FIELDS {
            let present = object.contains_key(field)
                || (field == "nutritionFacts" && object.contains_key(NUTRITION_FACTS_ALIAS));
            if !present {
                return Err(InputError::MissingField(field));
            }
        }

        let input: Self = serde_json::from_value(Value::Object(object))?;
        input.validate()?;
        Ok(input)
    }

    /// Check value ranges and blank names.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidValue` for the first offending field.
    pub fn validate(&self) -> Result<(), InputError> {
        non_blank("title", &self.title)?;
        non_blank("category", &self.category)?;
        non_negative("prepTime", self.prep_time)?;
        non_negative("cookTime", self.cook_time)?;
        positive("servings", self.servings)?;
        validate_collections(
            Some(&self.tags),
            Some(&self.ingredients),
            Some(&self.nutrition_facts),
            Some(&self.instructions),
        )
    }
}

/// Body of `PUT /recipes/{id}`.
///
/// Scalars are tri-state: absent keeps the stored value, `null` clears it.
/// `title` and `category` cannot be cleared. A collection that is absent
/// (or `null`) is left untouched; an empty list empties it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipeInput {
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub prep_time: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub cook_time: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub servings: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub difficulty: Option<Option<String>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub ingredients: Option<Vec<IngredientDraft>>,
    #[serde(default, alias = "nutrition_facts")]
    pub nutrition_facts: Option<Vec<NutritionFactDraft>>,
    #[serde(default)]
    pub instructions: Option<Vec<InstructionDraft>>,
}

impl UpdateRecipeInput {
    /// Parse and validate an update body.
    ///
    /// # Errors
    ///
    /// Returns `InputError` if the body is malformed, empty, or fails
    /// validation.
    pub fn from_slice(body: &[u8]) -> Result<Self, InputError> {
        let object = object_from_slice(body)?;
        if object.is_empty() {
            return Err(InputError::Empty);
        }

        let input: Self = serde_json::from_value(Value::Object(object))?;
        input.validate()?;
        Ok(input)
    }

    /// Check value ranges, blank names and non-clearable fields.
    ///
    /// # Errors
    ///
    /// Returns `InputError` for the first offending field.
    pub fn validate(&self) -> Result<(), InputError> {
        if let Some(title) = required_if_present("title", self.title.clone())? {
            non_blank("title", &title)?;
        }
        if let Some(category) = required_if_present("category", self.category.clone())? {
            non_blank("category", &category)?;
        }
        non_negative("prepTime", self.prep_time.flatten())?;
        non_negative("cookTime", self.cook_time.flatten())?;
        positive("servings", self.servings.flatten())?;
        validate_collections(
            self.tags.as_deref(),
            self.ingredients.as_deref(),
            self.nutrition_facts.as_deref(),
            self.instructions.as_deref(),
        )
    }

    /// Overwrite the scalars this update carries.
    pub fn apply_scalars(&self, fields: &mut RecipeFields) {
        if let Some(Some(title)) = &self.title {
            fields.title.clone_from(title);
        }
        if let Some(Some(category)) = &self.category {
            fields.category.clone_from(category);
        }
        if let Some(description) = &self.description {
            fields.description.clone_from(description);
        }
        if let Some(image_url) = &self.image_url {
            fields.image_url.clone_from(image_url);
        }
        if let Some(prep_time) = self.prep_time {
            fields.prep_time = prep_time;
        }
        if let Some(cook_time) = self.cook_time {
            fields.cook_time = cook_time;
        }
        if let Some(servings) = self.servings {
            fields.servings = servings;
        }
        if let Some(difficulty) = &self.difficulty {
            fields.difficulty.clone_from(difficulty);
        }
    }
}

fn validate_collections(
    tags: Option<&[String]>,
    ingredients: Option<&[IngredientDraft]>,
    nutrition_facts: Option<&[NutritionFactDraft]>,
    instructions: Option<&[InstructionDraft]>,
) -> Result<(), InputError> {
    for tag in tags.unwrap_or_default() {
        non_blank("tags", tag)?;
    }
    for ingredient in ingredients.unwrap_or_default() {
        non_blank("ingredients.name", &ingredient.name)?;
    }
    for fact in nutrition_facts.unwrap_or_default() {
        non_blank("nutritionFacts.name", &fact.name)?;
    }
    for step in instructions.unwrap_or_default() {
        positive("instructions.stepNumber", Some(step.step_number))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn create_body() -> Value {
        json!({
            "title": "Test Pasta",
            "description": null,
            "category": "Dinner",
            "tags": ["Quick"],
            "imageUrl": null,
            "prepTime": 10,
            "cookTime": 20,
            "servings": 2,
            "difficulty": "Easy",
            "ingredients": [{"name": "salt", "quantity": "1 tsp"}],
            "nutritionFacts": [],
            "instructions": [{"stepNumber": 1, "description": "Boil water"}]
        })
    }

    fn parse_create(body: &Value) -> Result<CreateRecipeInput, InputError> {
        CreateRecipeInput::from_slice(body.to_string().as_bytes())
    }

    fn parse_update(body: &Value) -> Result<UpdateRecipeInput, InputError> {
        UpdateRecipeInput::from_slice(body.to_string().as_bytes())
    }

    #[test]
    fn test_create_accepts_full_body() {
        let input = parse_create(&create_body()).unwrap();
        assert_eq!(input.title, "Test Pasta");
        assert_eq!(input.description, None);
        assert_eq!(input.instructions[0].step_number, 1);
    }

    #[test]
    fn test_create_requires_every_key() {
        for field in REQUIRED_FIELDS {
            let mut body = create_body();
            body.as_object_mut().unwrap().remove(field);
            let err = parse_create(&body).unwrap_err();
            assert!(
                matches!(err, InputError::MissingField(f) if f == field),
                "expected missing {field}, got {err}"
            );
        }
    }

    #[test]
    fn test_create_accepts_snake_case_nutrition_alias() {
        let mut body = create_body();
        let object = body.as_object_mut().unwrap();
        object.remove("nutritionFacts");
        object.insert(
            "nutrition_facts".to_owned(),
            json!([{"name": "protein", "quantity": "25g"}]),
        );

        let input = parse_create(&body).unwrap();
        assert_eq!(input.nutrition_facts.len(), 1);
    }

    #[test]
    fn test_create_rejects_null_title_and_bad_ranges() {
        let mut body = create_body();
        body["title"] = Value::Null;
        assert!(matches!(parse_create(&body), Err(InputError::Malformed(_))));

        let mut body = create_body();
        body["servings"] = json!(0);
        assert!(matches!(
            parse_create(&body),
            Err(InputError::InvalidValue { field: "servings", .. })
        ));

        let mut body = create_body();
        body["instructions"] = json!([{"stepNumber": 0, "description": "x"}]);
        assert!(parse_create(&body).is_err());
    }

    #[test]
    fn test_update_rejects_empty_and_non_object_bodies() {
        assert!(matches!(parse_update(&json!({})), Err(InputError::Empty)));
        assert!(matches!(
            parse_update(&json!("title")),
            Err(InputError::NotAnObject)
        ));
        assert!(matches!(
            UpdateRecipeInput::from_slice(b"{not json"),
            Err(InputError::Malformed(_))
        ));
    }

    #[test]
    fn test_update_rejects_null_title() {
        let err = parse_update(&json!({"title": null})).unwrap_err();
        assert!(matches!(err, InputError::NullField("title")));
    }

    #[test]
    fn test_update_null_collections_are_omitted() {
        let input = parse_update(&json!({"ingredients": null, "tags": null})).unwrap();
        assert!(input.ingredients.is_none());
        assert!(input.tags.is_none());

        let input = parse_update(&json!({"ingredients": []})).unwrap();
        assert_eq!(input.ingredients, Some(vec![]));
    }

    #[test]
    fn test_apply_scalars_is_tri_state() {
        let mut fields = RecipeFields {
            title: "Old".to_owned(),
            description: Some("desc".to_owned()),
            category: "Dinner".to_owned(),
            image_url: Some("/img.jpg".to_owned()),
            prep_time: Some(5),
            cook_time: Some(10),
            servings: Some(4),
            difficulty: Some("Easy".to_owned()),
        };

        let input = parse_update(&json!({
            "title": "New",
            "description": null,
            "prepTime": 15
        }))
        .unwrap();
        input.apply_scalars(&mut fields);

        assert_eq!(fields.title, "New");
        assert_eq!(fields.description, None);
        assert_eq!(fields.prep_time, Some(15));
        assert_eq!(fields.cook_time, Some(10));
        assert_eq!(fields.image_url.as_deref(), Some("/img.jpg"));
        assert_eq!(fields.difficulty.as_deref(), Some("Easy"));
    }

    #[test]
    fn test_detail_serialises_camel_case() {
        let detail = RecipeDetail {
            summary: RecipeSummary::new(
                RecipeId::new("r1"),
                RecipeFields {
                    title: "T".to_owned(),
                    description: None,
                    category: "C".to_owned(),
                    image_url: None,
                    prep_time: Some(1),
                    cook_time: None,
                    servings: None,
                    difficulty: None,
                },
                vec!["Quick".to_owned()],
            ),
            ingredients: vec![],
            instructions: vec![InstructionView {
                id: InstructionId::new("i1"),
                step_number: 1,
                description: "Stir".to_owned(),
            }],
            nutrition_facts: vec![],
        };

        let value = serde_json::to_value(&detail).unwrap();
        assert_eq!(value["id"], "r1");
        assert_eq!(value["prepTime"], 1);
        assert_eq!(value["imageUrl"], Value::Null);
        assert_eq!(value["tags"], json!(["Quick"]));
        assert_eq!(value["instructions"][0]["stepNumber"], 1);
        assert!(value.get("nutritionFacts").is_some());
    }
}
