use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::recipes::repo_types::{Recipe, RecipeFields};

#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// All recipes in insertion order.
    async fn list_all(&self) -> Result<Vec<Recipe>, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, StoreError>;
    async fn create(&self, fields: &RecipeFields) -> Result<Recipe, StoreError>;
    /// Overwrite every editable field. `NotFound` when `id` does not exist.
    async fn update(&self, id: i64, fields: &RecipeFields) -> Result<Recipe, StoreError>;
}

#[derive(Clone)]
pub struct PgRecipeStore {
    db: PgPool,
}

impl PgRecipeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn list_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, recipe_name, ingredients, cook_time, created_at
            FROM recipes
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, StoreError> {
        let row = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, recipe_name, ingredients, cook_time, created_at
            FROM recipes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, fields: &RecipeFields) -> Result<Recipe, StoreError> {
        let row = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (recipe_name, ingredients, cook_time)
            VALUES ($1, $2, $3)
            RETURNING id, recipe_name, ingredients, cook_time, created_at
            "#,
        )
        .bind(&fields.recipe_name)
        .bind(&fields.ingredients)
        .bind(fields.cook_time)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i64, fields: &RecipeFields) -> Result<Recipe, StoreError> {
        sqlx::query_as::<_, Recipe>(
            r#"
            UPDATE recipes
               SET recipe_name = $1, ingredients = $2, cook_time = $3
             WHERE id = $4
            RETURNING id, recipe_name, ingredients, cook_time, created_at
            "#,
        )
        .bind(&fields.recipe_name)
        .bind(&fields.ingredients)
        .bind(fields.cook_time)
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
#[derive(Default)]
pub struct MemoryRecipeStore {
    recipes: tokio::sync::RwLock<Vec<Recipe>>,
}

#[cfg(test)]
impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn list_all(&self) -> Result<Vec<Recipe>, StoreError> {
        Ok(self.recipes.read().await.clone())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Recipe>, StoreError> {
        let recipes = self.recipes.read().await;
        Ok(recipes.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, fields: &RecipeFields) -> Result<Recipe, StoreError> {
        let mut recipes = self.recipes.write().await;
        let recipe = Recipe {
            id: recipes.last().map_or(1, |r| r.id + 1),
            recipe_name: fields.recipe_name.clone(),
            ingredients: fields.ingredients.clone(),
            cook_time: fields.cook_time,
            created_at: time::OffsetDateTime::now_utc(),
        };
        recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn update(&self, id: i64, fields: &RecipeFields) -> Result<Recipe, StoreError> {
        let mut recipes = self.recipes.write().await;
        let recipe = recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound)?;
        recipe.recipe_name = fields.recipe_name.clone();
        recipe.ingredients = fields.ingredients.clone();
        recipe.cook_time = fields.cook_time;
        Ok(recipe.clone())
    }
}
