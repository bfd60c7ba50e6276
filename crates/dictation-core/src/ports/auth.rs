//! Authentication gate port.
//!
//! Playback commands and content mutation are disabled entirely while no
//! user is signed in. Nothing else about playback depends on who the user is.

use thiserror::Error;

/// Errors raised by authentication collaborators.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid user id or password")]
    InvalidCredentials,

    #[error("User '{0}' already exists")]
    UserExists(String),

    #[error("Invalid user id '{0}'")]
    InvalidUserId(String),

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Auth storage error: {0}")]
    Storage(String),
}

/// Answers whether a user is currently signed in.
pub trait AuthGate: Send + Sync {
    /// Whether a user is signed in.
    fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Id of the signed-in user, if any.
    fn current_user(&self) -> Option<String>;
}

/// Gate that always reports a fixed signed-in user.
///
/// For embedding the controller where sign-in is handled elsewhere, and for
/// tests.
#[derive(Debug, Clone)]
pub struct AlwaysAuthenticated {
    user_id: String,
}

impl AlwaysAuthenticated {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

impl Default for AlwaysAuthenticated {
    fn default() -> Self {
        Self::new("local")
    }
}

impl AuthGate for AlwaysAuthenticated {
    fn current_user(&self) -> Option<String> {
        Some(self.user_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn always_authenticated_reports_user() {
        let gate: Arc<dyn AuthGate> = Arc::new(AlwaysAuthenticated::new("winnie"));
        assert!(gate.is_authenticated());
        assert_eq!(gate.current_user().as_deref(), Some("winnie"));
    }
}
