//! Process-wide authentication session store.
//!
//! Holds the bearer token obtained at sign-in. The store is an explicitly
//! constructed object handed to each component that needs it - there is no
//! global singleton. Cart and wishlist operations consult it on every call;
//! an absent token turns those operations into silent no-ops.

use std::sync::{Arc, PoisonError, RwLock};

use freshcart_core::BearerToken;

/// Cheaply cloneable handle to the current session credential.
#[derive(Clone, Default)]
pub struct AuthSession {
    inner: Arc<RwLock<Option<BearerToken>>>,
}

impl AuthSession {
    /// Create an unauthenticated session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session seeded with an existing token (e.g. from the
    /// environment on CLI startup).
    #[must_use]
    pub fn with_token(token: BearerToken) -> Self {
        let session = Self::new();
        session.set(token);
        session
    }

    /// The current bearer token, if signed in.
    #[must_use]
    pub fn token(&self) -> Option<BearerToken> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a credential is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Store a new token, replacing any previous one.
    pub fn set(&self, token: BearerToken) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    /// Clear the session credential.
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unauthenticated() {
        let session = AuthSession::new();
        assert!(!session.is_authenticated());
        assert!(session.token().is_none());
    }

    #[test]
    fn set_and_clear_round_trip() {
        let session = AuthSession::new();
        session.set(BearerToken::new("tok"));
        assert!(session.is_authenticated());

        session.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn clones_share_state() {
        let session = AuthSession::new();
        let observer = session.clone();
        session.set(BearerToken::new("tok"));
        assert!(observer.is_authenticated());
    }
}
