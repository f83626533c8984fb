//! Newtype IDs for type-safe entity references.
//!
//! Every row in the recipe store is keyed by an opaque string. Use the
//! `define_id!` macro to create wrappers that prevent accidentally mixing IDs
//! from different entity types (binding an `IngredientId` where a `RecipeId`
//! is expected, for instance).

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `generate()` for a fresh UUID v4 id, `new()` to wrap an existing one
/// - `From<String>`/`From<&str>` and `Into<String>` implementations
/// - a transparent `sqlx::Type` implementation (with the `sqlite` feature)
///
/// The `sqlite` feature is evaluated in the crate that invokes the macro.
///
/// # Example
///
/// ```rust
/// # use recipe_box_core::define_id;
/// define_id!(RecipeId);
/// define_id!(TagId);
///
/// let recipe_id = RecipeId::new("seed-1");
/// let tag_id = TagId::generate();
///
/// // These are different types, so this won't compile:
/// // let _: RecipeId = tag_id;
/// # assert_eq!(recipe_id.as_str(), "seed-1");
/// # assert!(!tag_id.as_str().is_empty());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[cfg_attr(feature = "sqlite", derive(::sqlx::Type))]
        #[cfg_attr(feature = "sqlite", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing ID value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh, globally unique ID (UUID v4).
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4().to_string())
            }

            /// Borrow the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(RecipeId);
define_id!(TagId);
define_id!(IngredientId);
define_id!(InstructionId);
define_id!(NutritionFactId);
define_id!(ShoppingItemId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = RecipeId::generate();
        let b = RecipeId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn test_wrapped_id_keeps_value() {
        let id = RecipeId::new("seed-detailed-1");
        assert_eq!(id.as_str(), "seed-detailed-1");
        assert_eq!(id.to_string(), "seed-detailed-1");
        assert_eq!(String::from(id), "seed-detailed-1");
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = TagId::new("tag-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"tag-1\"");

        let parsed: TagId = serde_json::from_str("\"tag-2\"").unwrap();
        assert_eq!(parsed, TagId::from("tag-2"));
    }
}
