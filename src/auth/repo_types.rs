use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,                      // unique user ID
    pub username: String,             // unique login name
    pub password_hash: String,        // Argon2 PHC string, never the plaintext
    pub created_at: OffsetDateTime,   // creation timestamp
}
