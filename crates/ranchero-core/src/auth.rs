//! Authentication collaborator boundary.
//!
//! The dashboard does not gate anything on auth today; this trait is the
//! seam where a hosted backend plugs in later. The only consumer is
//! operator-identity resolution for `created_by` stamps, served by
//! [`LocalAuth`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Auth session state change, delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(AuthUser),
    SignedOut,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("no user is signed in")]
    NotSignedIn,
}

/// External authentication service boundary.
pub trait AuthProvider {
    fn sign_in(&mut self, email: &str, password: &str) -> Result<AuthUser, AuthError>;
    fn sign_up(&mut self, email: &str, password: &str) -> Result<AuthUser, AuthError>;
    fn sign_out(&mut self);
    fn current_user(&self) -> Option<&AuthUser>;
    /// Register a callback for session changes. Fired synchronously on
    /// sign-in and sign-out.
    fn on_auth_state_change(&mut self, callback: Box<dyn FnMut(&AuthEvent)>);
}

/// Credential-free local provider: whoever the process says you are, you
/// are. Mirrors the single-operator reality of the fixture-backed build.
#[derive(Default)]
pub struct LocalAuth {
    user: Option<AuthUser>,
    subscribers: Vec<Box<dyn FnMut(&AuthEvent)>>,
}

impl LocalAuth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn notify(&mut self, event: &AuthEvent) {
        for callback in &mut self.subscribers {
            callback(event);
        }
    }
}

impl std::fmt::Debug for LocalAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalAuth")
            .field("user", &self.user)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl AuthProvider for LocalAuth {
    fn sign_in(&mut self, email: &str, _password: &str) -> Result<AuthUser, AuthError> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidCredentials);
        }
        let name = email
            .split('@')
            .next()
            .unwrap_or(email)
            .to_string();
        let user = AuthUser {
            id: format!("local-{name}"),
            email: email.to_string(),
            name,
        };
        self.user = Some(user.clone());
        self.notify(&AuthEvent::SignedIn(user.clone()));
        Ok(user)
    }

    fn sign_up(&mut self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        // local provider has no account storage; sign-up is sign-in
        self.sign_in(email, password)
    }

    fn sign_out(&mut self) {
        if self.user.take().is_some() {
            self.notify(&AuthEvent::SignedOut);
        }
    }

    fn current_user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    fn on_auth_state_change(&mut self, callback: Box<dyn FnMut(&AuthEvent)>) {
        self.subscribers.push(callback);
    }
}
