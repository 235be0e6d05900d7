use crate::config::SessionConfig;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};

pub const SESSION_COOKIE: &str = "session";

// Key::from panics below this length.
const KEY_BYTES: usize = 64;

/// Signing key for the session cookie. Short secrets are repeated up to the
/// required length; an empty secret gives a per-process key.
pub fn session_key(config: &SessionConfig) -> Key {
    let secret = config.secret.as_bytes();
    if secret.is_empty() {
        log::warn!("SESSION_SECRET is not set, sessions will not survive a restart");
        return Key::generate();
    }
    if secret.len() < KEY_BYTES {
        log::warn!("Session secret shorter than {KEY_BYTES} bytes, stretching it");
    }
    let material: Vec<u8> = secret.iter().copied().cycle().take(secret.len().max(KEY_BYTES)).collect();
    Key::from(&material)
}

/// Cookie-backed session storage holding only the user id.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_string())
        .cookie_path("/".to_string())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_is_stretched_deterministically() {
        let config = SessionConfig {
            secret: "short-secret".to_string(),
            cookie_secure: false,
        };
        assert_eq!(session_key(&config).master(), session_key(&config).master());
    }

    #[test]
    fn test_empty_secret_generates_key() {
        let key = session_key(&SessionConfig::default());
        assert_eq!(key.master().len(), KEY_BYTES);
    }
}
