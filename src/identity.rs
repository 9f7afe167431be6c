//! Identity provider seam and the user/session types it issues.
//!
//! The façade never validates credentials itself: it hands an account and
//! token to an [`IdentityProvider`] and tracks the [`User`] that comes back.

use async_trait::async_trait;

use crate::error::MercuryError;
use crate::protocol::Presence;

/// One authenticated binding of a user account to a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    /// Account the session belongs to.
    pub user_account: String,
    /// Token issued (or accepted) by the identity provider.
    pub token: String,
    /// `true` while the session is authenticated.
    pub logged_in: bool,
}

impl UserSession {
    /// Create a logged-in session for the given account and token.
    pub fn new(user_account: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_account: user_account.into(),
            token: token.into(),
            logged_in: true,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }
}

/// A user as returned by an identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: String,
    presence: Presence,
    session: UserSession,
}

impl User {
    /// Create an offline user wrapping `session`.
    pub fn new(id: impl Into<String>, session: UserSession) -> Self {
        Self {
            id: id.into(),
            presence: Presence::Offline,
            session,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn session(&self) -> &UserSession {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut UserSession {
        &mut self.session
    }

    /// Mark the user online.
    pub fn set_online(&mut self) {
        self.presence = Presence::Online;
    }

    /// Mark the user offline.
    pub fn set_offline(&mut self) {
        self.presence = Presence::Offline;
    }
}

/// Performs login and logout against the platform's identity service.
///
/// # Object Safety
///
/// This trait is object-safe. The façade stores providers as
/// `Arc<dyn IdentityProvider>`.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Authenticate `account` with `token` and return the resulting user.
    ///
    /// # Errors
    ///
    /// Returns [`MercuryError::LoginRejected`] if the credentials are refused,
    /// or any other error the provider's transport produced.
    async fn login(&self, account: &str, token: &str) -> Result<User, MercuryError>;

    /// End the session bound to `account` and `token`.
    ///
    /// # Errors
    ///
    /// Returns [`MercuryError::LogoutFailed`] if the service could not end the
    /// session. The façade logs this and proceeds.
    async fn logout(&self, account: &str, token: &str) -> Result<(), MercuryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_logged_in() {
        let session = UserSession::new("alice", "tok");
        assert!(session.is_logged_in());
        assert_eq!(session.user_account, "alice");
    }

    #[test]
    fn user_starts_offline_and_toggles() {
        let mut user = User::new("u-1", UserSession::new("alice", "tok"));
        assert_eq!(user.presence(), Presence::Offline);
        user.set_online();
        assert_eq!(user.presence(), Presence::Online);
        user.set_offline();
        assert_eq!(user.presence(), Presence::Offline);
    }
}
