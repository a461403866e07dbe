use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        password::{hash_password, verify_dummy, verify_password},
        repo::UserStore,
        repo_types::User,
        session::{SessionContext, SessionKeys},
    },
    error::{AppError, AppResult},
};

pub const MAX_USERNAME_LEN: usize = 100;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9_.@-]+$").unwrap();
}

pub(crate) fn normalize_username(raw: &str) -> AppResult<String> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".into()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LEN} characters"
        )));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(AppError::Validation(
            "Username may only contain letters, digits and . _ @ -".into(),
        ));
    }
    Ok(username.to_string())
}

/// Create an account. Fails with `UsernameTaken` when the name is already in use.
#[instrument(skip(users, password))]
pub async fn register(users: &dyn UserStore, username: &str, password: &str) -> AppResult<User> {
    let username = normalize_username(username)?;
    if password.is_empty() {
        return Err(AppError::Validation("Password is required".into()));
    }

    if users.find_by_username(&username).await?.is_some() {
        warn!(username = %username, "username already registered");
        return Err(AppError::UsernameTaken);
    }

    let hash = hash_password(password)?;
    // A concurrent registration may win between the lookup and this insert;
    // the store then reports DuplicateUsername, which stays a generic failure.
    let user = users.create(&username, &hash).await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(user)
}

/// Check credentials, mark `session` as logged in and return the signed token
/// to hand back to the client.
#[instrument(skip(users, keys, session, password))]
pub async fn login(
    users: &dyn UserStore,
    keys: &SessionKeys,
    session: &mut SessionContext,
    username: &str,
    password: &str,
) -> AppResult<String> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        verify_dummy(password);
        warn!("login with missing credentials");
        return Err(AppError::InvalidCredentials);
    }

    let Some(user) = users.find_by_username(username).await? else {
        verify_dummy(password);
        warn!(username = %username, "login invalid credentials");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(username = %username, user_id = user.id, "login invalid credentials");
        return Err(AppError::InvalidCredentials);
    }

    let token = keys.sign(user.id)?;
    session.set_user(user.id);

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(token)
}

pub fn logout(session: &mut SessionContext) {
    session.clear();
}

pub fn is_authenticated(session: &SessionContext) -> bool {
    session.is_authenticated()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::repo::MemoryUserStore, config::SessionConfig};

    fn keys() -> SessionKeys {
        SessionKeys::from(&SessionConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
            cookie_secure: false,
        })
    }

    #[tokio::test]
    async fn register_then_login_succeeds() {
        let users = MemoryUserStore::new();
        let keys = keys();
        let user = register(&users, "alice", "pa55word").await.unwrap();
        assert_ne!(user.password_hash, "pa55word");

        let mut session = SessionContext::anonymous();
        let token = login(&users, &keys, &mut session, "alice", "pa55word")
            .await
            .unwrap();
        assert!(is_authenticated(&session));
        assert_eq!(keys.verify(&token).unwrap().sub, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_indistinguishable() {
        let users = MemoryUserStore::new();
        let keys = keys();
        register(&users, "alice", "right").await.unwrap();

        let mut session = SessionContext::anonymous();
        let wrong = login(&users, &keys, &mut session, "alice", "wrong")
            .await
            .unwrap_err();
        let unknown = login(&users, &keys, &mut session, "nobody", "right")
            .await
            .unwrap_err();

        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.user_message(), unknown.user_message());
        assert_eq!(wrong.redirect_target(), unknown.redirect_target());
        assert!(!is_authenticated(&session));
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let users = MemoryUserStore::new();
        register(&users, "alice", "one").await.unwrap();
        let err = register(&users, "alice", "two").await.unwrap_err();
        assert!(matches!(err, AppError::UsernameTaken));
        assert_eq!(users.count_username("alice").await, 1);
    }

    #[tokio::test]
    async fn register_validates_input() {
        let users = MemoryUserStore::new();
        assert!(matches!(
            register(&users, "   ", "pw").await.unwrap_err(),
            AppError::Validation(_)
        ));
        assert!(matches!(
            register(&users, "alice", "").await.unwrap_err(),
            AppError::Validation(_)
        ));
        assert!(matches!(
            register(&users, "<script>", "pw").await.unwrap_err(),
            AppError::Validation(_)
        ));
        let long = "a".repeat(MAX_USERNAME_LEN + 1);
        assert!(matches!(
            register(&users, &long, "pw").await.unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn login_is_idempotent_and_logout_clears() {
        let users = MemoryUserStore::new();
        let keys = keys();
        register(&users, "bob", "pw").await.unwrap();

        let mut session = SessionContext::anonymous();
        login(&users, &keys, &mut session, "bob", "pw").await.unwrap();
        login(&users, &keys, &mut session, "bob", "pw").await.unwrap();
        assert!(is_authenticated(&session));

        logout(&mut session);
        assert!(!is_authenticated(&session));
    }

    #[tokio::test]
    async fn login_with_empty_fields_is_invalid_credentials() {
        let users = MemoryUserStore::new();
        let keys = keys();
        register(&users, "dana", "pw").await.unwrap();

        let mut session = SessionContext::anonymous();
        for (username, password) in [("dana", ""), ("", "pw"), ("  ", "")] {
            let err = login(&users, &keys, &mut session, username, password)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidCredentials));
        }
        assert!(!is_authenticated(&session));
    }

    #[tokio::test]
    async fn login_trims_username_like_register() {
        let users = MemoryUserStore::new();
        register(&users, "  carol ", "pw").await.unwrap();
        let mut session = SessionContext::anonymous();
        login(&users, &keys(), &mut session, "carol", "pw")
            .await
            .unwrap();
        assert!(session.is_authenticated());
    }
}
