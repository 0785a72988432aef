//! # Session
//!
//! The injected bearer credential and logged-in user snapshot.
//!
//! The source system kept `access_token` and a `user` blob in
//! process-wide mutable storage; here the session is an explicit value
//! handed to whatever needs it, with an explicit lifecycle: populated
//! at login, cleared at logout or when the server answers 401.
//!
//! Cloned handles share state via `Arc<RwLock<_>>`; critical sections
//! are a field read or a replace, never held across an await.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// The authenticated user, as returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Role string as the backend reports it ("admin", "cashier").
    pub role: String,
}

#[derive(Debug, Clone)]
struct Credentials {
    token: String,
    user: User,
    /// Correlation id for this login, used in logs only.
    session_id: Uuid,
}

/// Shared session handle.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<Credentials>>>,
}

impl Session {
    /// Creates an unauthenticated session.
    pub fn new() -> Self {
        Session::default()
    }

    /// Stores the credential after a successful login.
    pub fn login(&self, token: impl Into<String>, user: User) {
        let session_id = Uuid::new_v4();
        info!(session_id = %session_id, username = %user.username, "session opened");

        let mut guard = self.inner.write().expect("session lock poisoned");
        *guard = Some(Credentials {
            token: token.into(),
            user,
            session_id,
        });
    }

    /// Clears the credential at logout.
    pub fn logout(&self) {
        let mut guard = self.inner.write().expect("session lock poisoned");
        if let Some(creds) = guard.take() {
            info!(session_id = %creds.session_id, "session closed");
        }
    }

    /// Clears the credential after the server rejected it. Called by
    /// the HTTP layer on a 401 response.
    pub fn invalidate(&self) {
        let mut guard = self.inner.write().expect("session lock poisoned");
        if let Some(creds) = guard.take() {
            warn!(session_id = %creds.session_id, "credential rejected by server, session cleared");
        }
    }

    /// The current bearer token, if authenticated.
    pub fn token(&self) -> Option<String> {
        let guard = self.inner.read().expect("session lock poisoned");
        guard.as_ref().map(|c| c.token.clone())
    }

    /// The logged-in user, if authenticated.
    pub fn user(&self) -> Option<User> {
        let guard = self.inner.read().expect("session lock poisoned");
        guard.as_ref().map(|c| c.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .expect("session lock poisoned")
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 1,
            username: "cashier1".to_string(),
            role: "cashier".to_string(),
        }
    }

    #[test]
    fn login_logout_lifecycle() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);

        session.login("tok-abc", user());
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("tok-abc"));
        assert_eq!(session.user().unwrap().username, "cashier1");

        session.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn invalidate_clears_credentials() {
        let session = Session::new();
        session.login("tok-abc", user());

        session.invalidate();
        assert!(!session.is_authenticated());

        // Invalidating twice is harmless.
        session.invalidate();
    }

    #[test]
    fn clones_share_state() {
        let session = Session::new();
        let other = session.clone();

        session.login("tok-abc", user());
        assert!(other.is_authenticated());

        other.logout();
        assert!(!session.is_authenticated());
    }
}
