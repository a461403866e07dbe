use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::recipes::repo_types::{Recipe, RecipeFields};

pub const MAX_RECIPE_NAME_LEN: usize = 100;

/// Raw form body for add/edit. Kept as strings so a rejected submission can be
/// shown back to the user unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeForm {
    #[serde(default)]
    pub recipe_name: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default)]
    pub cook_time: String,
}

impl RecipeForm {
    pub fn validate(&self) -> AppResult<RecipeFields> {
        let recipe_name = self.recipe_name.trim();
        if recipe_name.is_empty() {
            return Err(AppError::Validation("Recipe name is required".into()));
        }
        if recipe_name.chars().count() > MAX_RECIPE_NAME_LEN {
            return Err(AppError::Validation(format!(
                "Recipe name must be at most {MAX_RECIPE_NAME_LEN} characters"
            )));
        }

        // No range check: the value is stored as submitted.
        let cook_time = self
            .cook_time
            .trim()
            .parse::<i32>()
            .map_err(|_| AppError::Validation("Cook time must be a whole number of minutes".into()))?;

        Ok(RecipeFields {
            recipe_name: recipe_name.to_string(),
            ingredients: self.ingredients.clone(),
            cook_time,
        })
    }
}

impl From<&Recipe> for RecipeForm {
    fn from(r: &Recipe) -> Self {
        Self {
            recipe_name: r.recipe_name.clone(),
            ingredients: r.ingredients.clone(),
            cook_time: r.cook_time.to_string(),
        }
    }
}
