use sqlx::FromRow;
use time::OffsetDateTime;

/// Recipe record in the database.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Recipe {
    pub id: i64,
    pub recipe_name: String,
    pub ingredients: String,
    pub cook_time: i32, // minutes
    pub created_at: OffsetDateTime,
}

/// The user-editable part of a recipe, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFields {
    pub recipe_name: String,
    pub ingredients: String,
    pub cook_time: i32,
}
