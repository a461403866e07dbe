#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
}

pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60 * 24;
/// One year; keeps `now + ttl` far from the timestamp range.
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;

/// Parse `SESSION_TTL_MINUTES`, falling back to the default when it is
/// missing, malformed or outside `1..=MAX_SESSION_TTL_MINUTES`.
pub fn session_ttl_minutes(raw: Option<&str>) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| (1..=MAX_SESSION_TTL_MINUTES).contains(v))
        .unwrap_or(DEFAULT_SESSION_TTL_MINUTES)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET")?,
            issuer: std::env::var("SESSION_ISSUER").unwrap_or_else(|_| "recipebook".into()),
            audience: std::env::var("SESSION_AUDIENCE")
                .unwrap_or_else(|_| "recipebook-web".into()),
            ttl_minutes: session_ttl_minutes(std::env::var("SESSION_TTL_MINUTES").ok().as_deref()),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        };
        Ok(Self {
            database_url,
            session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_accepts_values_in_range() {
        assert_eq!(session_ttl_minutes(Some("30")), 30);
        assert_eq!(
            session_ttl_minutes(Some(&MAX_SESSION_TTL_MINUTES.to_string())),
            MAX_SESSION_TTL_MINUTES
        );
    }

    #[test]
    fn ttl_falls_back_on_missing_or_out_of_range() {
        assert_eq!(session_ttl_minutes(None), DEFAULT_SESSION_TTL_MINUTES);
        assert_eq!(session_ttl_minutes(Some("abc")), DEFAULT_SESSION_TTL_MINUTES);
        assert_eq!(session_ttl_minutes(Some("0")), DEFAULT_SESSION_TTL_MINUTES);
        assert_eq!(session_ttl_minutes(Some("-5")), DEFAULT_SESSION_TTL_MINUTES);
        assert_eq!(
            session_ttl_minutes(Some(&i64::MAX.to_string())),
            DEFAULT_SESSION_TTL_MINUTES
        );
    }
}
