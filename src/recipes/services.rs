use tracing::{info, instrument, warn};

use crate::{
    auth::{services::is_authenticated, session::SessionContext},
    error::{AppError, AppResult, StoreError},
    recipes::{
        repo::RecipeStore,
        repo_types::{Recipe, RecipeFields},
    },
};

fn require_session(session: &SessionContext) -> AppResult<()> {
    if is_authenticated(session) {
        Ok(())
    } else {
        warn!("recipe mutation without session");
        Err(AppError::Unauthorized)
    }
}

/// Every recipe, oldest first. Open to anonymous visitors.
pub async fn list_recipes(store: &dyn RecipeStore) -> AppResult<Vec<Recipe>> {
    Ok(store.list_all().await?)
}

/// Load a recipe for editing.
#[instrument(skip(store, session))]
pub async fn get_recipe(
    store: &dyn RecipeStore,
    session: &SessionContext,
    id: i64,
) -> AppResult<Recipe> {
    require_session(session)?;
    store.find_by_id(id).await?.ok_or(AppError::NotFound)
}

#[instrument(skip(store, session, fields))]
pub async fn add_recipe(
    store: &dyn RecipeStore,
    session: &SessionContext,
    fields: RecipeFields,
) -> AppResult<Recipe> {
    require_session(session)?;
    let recipe = store.create(&fields).await?;
    info!(recipe_id = recipe.id, name = %recipe.recipe_name, by = ?session.user_id(), "recipe added");
    Ok(recipe)
}

#[instrument(skip(store, session, fields))]
pub async fn edit_recipe(
    store: &dyn RecipeStore,
    session: &SessionContext,
    id: i64,
    fields: RecipeFields,
) -> AppResult<Recipe> {
    require_session(session)?;
    match store.update(id, &fields).await {
        Ok(recipe) => {
            info!(recipe_id = recipe.id, by = ?session.user_id(), "recipe updated");
            Ok(recipe)
        }
        Err(StoreError::NotFound) => Err(AppError::NotFound),
        Err(e) => Err(e.into()),
    }
}
