//! Bearer token credential type.
//!
//! The upstream API authenticates every cart, wishlist, and order call with
//! an opaque session token passed in a custom `token` header. The token is
//! wrapped in [`secrecy::SecretString`] so it never appears in `Debug`
//! output or logs.

use secrecy::{ExposeSecret, SecretString};

/// An opaque bearer token proving an authenticated session.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Expose the raw token for attaching to a request header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}

impl From<String> for BearerToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_the_token() {
        let token = BearerToken::new("eyJhbGciOiJIUzI1NiJ9.secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn expose_returns_the_raw_token() {
        let token = BearerToken::new("abc");
        assert_eq!(token.expose(), "abc");
    }
}
