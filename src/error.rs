use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;
use tracing::error;

use crate::flash::{self, Flash};

/// Failures raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,

    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Failures surfaced by the auth and recipe services.
///
/// The display text of the user-facing variants is exactly what ends up in
/// the flash message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Username already exists. Please choose a different username.")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("You need to be logged in to do that.")]
    Unauthorized,

    #[error("Recipe not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    // Includes StoreError::DuplicateUsername from a lost registration race.
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

impl AppError {
    /// Where the browser is sent after this error is flashed.
    pub fn redirect_target(&self) -> &'static str {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials => "/login",
            AppError::UsernameTaken => "/register",
            _ => "/",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            AppError::Store(_) | AppError::Internal(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Store(e) => error!(error = %e, "store failure"),
            AppError::Internal(e) => error!(error = %e, "internal failure"),
            _ => {}
        }
        let jar = flash::push(CookieJar::new(), Flash::error(self.user_message()));
        (jar, Redirect::to(self.redirect_target())).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};

    #[test]
    fn unauthorized_redirects_to_login_with_flash() {
        let res = AppError::Unauthorized.into_response();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[header::LOCATION], "/login");
        assert_eq!(
            flash::from_response(&res),
            Some(Flash::error("You need to be logged in to do that."))
        );
    }

    #[test]
    fn not_found_redirects_home() {
        let res = AppError::NotFound.into_response();
        assert_eq!(res.headers()[header::LOCATION], "/");
    }

    #[test]
    fn store_failures_hide_details() {
        let err = AppError::from(StoreError::DuplicateUsername);
        assert_eq!(err.user_message(), GENERIC_FAILURE);
        assert_eq!(err.redirect_target(), "/");
    }
}
