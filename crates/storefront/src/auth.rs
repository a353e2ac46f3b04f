//! Authentication session data.
//!
//! Identity is the remote auth backend's concern; this module only carries
//! the `{user id, session token}` pair it issued. The token is wrapped in
//! [`SecretString`] so it never leaks through `Debug` output, and exposed
//! only where it is spliced into backend request paths.

use secrecy::{ExposeSecret, SecretString};

use ecostore_core::UserId;

/// The signed-in user's session, read-only from this service's
/// perspective.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: UserId,
    token: SecretString,
}

impl AuthSession {
    #[must_use]
    pub fn new(user_id: UserId, token: impl Into<String>) -> Self {
        Self {
            user_id,
            token: SecretString::from(token.into()),
        }
    }

    /// The raw session token, for backend request paths.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let session = AuthSession::new(UserId::new(1), "super-secret-token");
        let debug = format!("{session:?}");
        assert!(!debug.contains("super-secret-token"));
    }

    #[test]
    fn test_token_exposed_for_request_paths() {
        let session = AuthSession::new(UserId::new(1), "tok");
        assert_eq!(session.token(), "tok");
    }
}
