use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{LoginForm, RegisterForm},
        services,
        session::{SessionContext, SessionKeys},
    },
    error::AppError,
    flash::{self, Flash},
    state::AppState,
    views,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", get(logout))
}

pub async fn login_page(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, flash) = flash::take(jar);
    (jar, views::login_page(flash.as_ref(), "", None))
}

pub async fn register_page(jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, flash) = flash::take(jar);
    (jar, views::register_page(flash.as_ref(), "", None))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    mut session: SessionContext,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let keys = SessionKeys::from_ref(&state);
    let res = services::login(
        state.users.as_ref(),
        &keys,
        &mut session,
        &form.username,
        &form.password,
    )
    .await;

    match res {
        Ok(token) => {
            let jar = flash::push(
                jar.add(keys.cookie(token)),
                Flash::success("Logged in successfully"),
            );
            (jar, Redirect::to("/")).into_response()
        }
        Err(e @ AppError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            views::login_page(None, &form.username, Some(&e.user_message())),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    match services::register(state.users.as_ref(), &form.username, &form.password).await {
        Ok(_) => {
            let jar = flash::push(jar, Flash::success("Registration successful. Please login."));
            (jar, Redirect::to("/login")).into_response()
        }
        Err(e @ AppError::UsernameTaken) => (
            StatusCode::CONFLICT,
            views::register_page(None, &form.username, Some(&e.user_message())),
        )
            .into_response(),
        Err(e @ AppError::Validation(_)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            views::register_page(None, &form.username, Some(&e.user_message())),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[instrument(skip_all)]
pub async fn logout(mut session: SessionContext, jar: CookieJar) -> (CookieJar, Redirect) {
    let was_logged_in = services::is_authenticated(&session);
    services::logout(&mut session);

    let jar = jar.remove(SessionKeys::removal_cookie());
    let jar = if was_logged_in {
        info!("user logged out");
        flash::push(jar, Flash::success("Logged out"))
    } else {
        jar
    };
    (jar, Redirect::to("/"))
}
