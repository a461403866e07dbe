//! One-shot status messages carried across a redirect in a short cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

impl FlashKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FlashKind::Success => "success",
            FlashKind::Error => "error",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(FlashKind::Success),
            "error" => Some(FlashKind::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    // The jar percent-encodes cookie values on the wire.
    fn encode(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.message)
    }

    fn decode(raw: &str) -> Option<Self> {
        let (kind, message) = raw.split_once(':')?;
        Some(Self {
            kind: FlashKind::parse(kind)?,
            message: message.to_string(),
        })
    }
}

/// Queue a message for the next rendered page.
pub fn push(jar: CookieJar, flash: Flash) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, flash.encode()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Read the pending message, if any, and schedule its removal.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, None);
    };
    let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/"));
    (jar, Flash::decode(&raw))
}

/// Read back the flash a response sets, the way the next request would see it.
#[cfg(test)]
pub(crate) fn from_response(res: &axum::response::Response) -> Option<Flash> {
    use axum::http::{header, HeaderMap, HeaderValue};

    let pair = res
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{FLASH_COOKIE}=")))?
        .split(';')
        .next()?
        .to_string();
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(&pair).ok()?);
    take(CookieJar::from_headers(&headers)).1
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn message_with_separators_survives_the_cookie_round_trip() {
        let flash = Flash::error("Invalid username; or: \"password\", really");
        let res = (push(CookieJar::new(), flash.clone()), ()).into_response();
        let raw = res.headers()[axum::http::header::SET_COOKIE].to_str().unwrap();
        assert!(!raw.contains("%25"), "value encoded twice: {raw}");
        assert_eq!(from_response(&res), Some(flash));
    }

    #[test]
    fn decode_rejects_unknown_kind() {
        assert_eq!(Flash::decode("warning:hello"), None);
        assert_eq!(Flash::decode("no-separator"), None);
    }

    #[test]
    fn take_clears_cookie() {
        let res = (push(CookieJar::new(), Flash::success("Recipe added successfully")), ())
            .into_response();
        assert_eq!(
            from_response(&res),
            Some(Flash::success("Recipe added successfully"))
        );

        let pair = format!("{FLASH_COOKIE}=success:done");
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(axum::http::header::COOKIE, pair.parse().unwrap());
        let (jar, flash) = take(CookieJar::from_headers(&headers));
        assert_eq!(flash, Some(Flash::success("done")));
        assert!(jar.get(FLASH_COOKIE).is_none());
    }

    #[test]
    fn take_without_cookie_is_noop() {
        let (jar, flash) = take(CookieJar::new());
        assert!(flash.is_none());
        assert!(jar.iter().next().is_none());
    }
}
