use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::repo_types::User;
use crate::error::StoreError;

/// Credential store. `create` does not check for an existing username itself;
/// callers look up first, and a lost race surfaces as `DuplicateUsername`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store behind `AppState::fake`.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryUserStore {
    users: tokio::sync::RwLock<Vec<User>>,
}

#[cfg(test)]
impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count_username(&self, username: &str) -> usize {
        self.users
            .read()
            .await
            .iter()
            .filter(|u| u.username == username)
            .count()
    }
}

#[cfg(test)]
#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Err(StoreError::DuplicateUsername);
        }
        let user = User {
            id: users.len() as i64 + 1,
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: time::OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_assigns_ids_and_finds_by_username() {
        let store = MemoryUserStore::new();
        let a = store.create("alice", "h1").await.unwrap();
        let b = store.create("bob", "h2").await.unwrap();
        assert_ne!(a.id, b.id);

        let found = store.find_by_username("bob").await.unwrap().unwrap();
        assert_eq!(found.id, b.id);
        assert_eq!(found.password_hash, "h2");
        assert!(store.find_by_username("carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn memory_store_rejects_duplicate_username() {
        let store = MemoryUserStore::new();
        store.create("alice", "h1").await.unwrap();
        let err = store.create("alice", "h2").await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));
        assert_eq!(store.count_username("alice").await, 1);
    }
}
