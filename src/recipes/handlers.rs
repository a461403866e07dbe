use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, instrument};

use crate::{
    auth::{services::is_authenticated, session::SessionContext},
    error::{AppError, AppResult, GENERIC_FAILURE},
    flash::{self, Flash},
    recipes::{dto::RecipeForm, services},
    state::AppState,
    views,
};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/add", get(add_page).post(add))
        .route("/edit_recipe/:id", get(edit_page).post(edit))
}

// Non-integer ids are simply recipes that do not exist.
fn recipe_id(path: Result<Path<i64>, PathRejection>) -> AppResult<i64> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    session: SessionContext,
    jar: CookieJar,
) -> Response {
    // Errors elsewhere redirect here, so this one must not.
    let recipes = match services::list_recipes(state.recipes.as_ref()).await {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "list recipes failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE).into_response();
        }
    };
    let (jar, flash) = flash::take(jar);
    (
        jar,
        views::index(&recipes, flash.as_ref(), is_authenticated(&session)),
    )
        .into_response()
}

pub async fn add_page(session: SessionContext) -> Result<Html<String>, AppError> {
    if !is_authenticated(&session) {
        return Err(AppError::Unauthorized);
    }
    Ok(views::recipe_form("Add recipe", "/add", &RecipeForm::default(), None))
}

#[instrument(skip_all)]
pub async fn add(
    State(state): State<AppState>,
    session: SessionContext,
    jar: CookieJar,
    Form(form): Form<RecipeForm>,
) -> Response {
    if !is_authenticated(&session) {
        return AppError::Unauthorized.into_response();
    }
    let fields = match form.validate() {
        Ok(f) => f,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                views::recipe_form("Add recipe", "/add", &form, Some(&e.user_message())),
            )
                .into_response()
        }
    };

    match services::add_recipe(state.recipes.as_ref(), &session, fields).await {
        Ok(_) => {
            let jar = flash::push(jar, Flash::success("Recipe added successfully"));
            (jar, Redirect::to("/")).into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[instrument(skip_all)]
pub async fn edit_page(
    State(state): State<AppState>,
    session: SessionContext,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Html<String>, AppError> {
    if !is_authenticated(&session) {
        return Err(AppError::Unauthorized);
    }
    let id = recipe_id(path)?;
    let recipe = services::get_recipe(state.recipes.as_ref(), &session, id).await?;
    Ok(views::recipe_form(
        "Edit recipe",
        &format!("/edit_recipe/{id}"),
        &RecipeForm::from(&recipe),
        None,
    ))
}

#[instrument(skip_all)]
pub async fn edit(
    State(state): State<AppState>,
    session: SessionContext,
    jar: CookieJar,
    path: Result<Path<i64>, PathRejection>,
    Form(form): Form<RecipeForm>,
) -> Response {
    if !is_authenticated(&session) {
        return AppError::Unauthorized.into_response();
    }
    let id = match recipe_id(path) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    // The recipe must exist before the submitted values are judged.
    if let Err(e) = services::get_recipe(state.recipes.as_ref(), &session, id).await {
        return e.into_response();
    }
    let fields = match form.validate() {
        Ok(f) => f,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                views::recipe_form(
                    "Edit recipe",
                    &format!("/edit_recipe/{id}"),
                    &form,
                    Some(&e.user_message()),
                ),
            )
                .into_response()
        }
    };

    match services::edit_recipe(state.recipes.as_ref(), &session, id, fields).await {
        Ok(_) => {
            let jar = flash::push(jar, Flash::success("Recipe updated successfully"));
            (jar, Redirect::to("/")).into_response()
        }
        Err(e) => e.into_response(),
    }
}
