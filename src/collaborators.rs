//! Wiring of the façade's collaborators.
//!
//! A [`Client`](crate::Client) does not know which signaling channel or
//! identity provider it talks to. The application supplies a factory for
//! each [`CollaboratorKind`] in a [`Collaborators`] set; the façade invokes
//! them once at construction with a [`CollaboratorContext`] carrying its id
//! and application settings.
//!
//! ```
//! # use std::sync::Arc;
//! # use async_trait::async_trait;
//! # use mercury_client::error::MercuryError;
//! # use mercury_client::signaling::SignalingChannel;
//! use mercury_client::collaborators::{CollaboratorKind, Collaborators};
//!
//! # struct NullChannel;
//! # #[async_trait]
//! # impl SignalingChannel for NullChannel {
//! #     async fn open(&self) -> Result<(), MercuryError> { Ok(()) }
//! #     async fn close(&self) -> Result<(), MercuryError> { Ok(()) }
//! #     async fn send(&self, _: String) -> Result<(), MercuryError> { Ok(()) }
//! # }
//! let collaborators = Collaborators::new()
//!     .with_signaling_channel(|_ctx| Arc::new(NullChannel) as Arc<dyn SignalingChannel>);
//! assert_eq!(collaborators.missing(), vec![CollaboratorKind::IdentityProvider]);
//! ```

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::AppSettings;
use crate::error::{MercuryError, Result};
use crate::identity::IdentityProvider;
use crate::registry::ClientId;
use crate::signaling::SignalingChannel;

/// Roles a façade needs filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollaboratorKind {
    SignalingChannel,
    IdentityProvider,
}

impl fmt::Display for CollaboratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignalingChannel => f.write_str("signaling channel"),
            Self::IdentityProvider => f.write_str("identity provider"),
        }
    }
}

/// What a factory learns about the façade it is building for.
#[derive(Debug, Clone)]
pub struct CollaboratorContext {
    pub client_id: ClientId,
    pub app: AppSettings,
}

pub type SignalingChannelFactory =
    Arc<dyn Fn(&CollaboratorContext) -> Arc<dyn SignalingChannel> + Send + Sync>;

pub type IdentityProviderFactory =
    Arc<dyn Fn(&CollaboratorContext) -> Arc<dyn IdentityProvider> + Send + Sync>;

/// Factories for each collaborator role.
///
/// Cloning shares the factories, so one set can build any number of façades.
#[derive(Clone, Default)]
pub struct Collaborators {
    signaling_channel: Option<SignalingChannelFactory>,
    identity_provider: Option<IdentityProviderFactory>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_signaling_channel<F>(mut self, factory: F) -> Self
    where
        F: Fn(&CollaboratorContext) -> Arc<dyn SignalingChannel> + Send + Sync + 'static,
    {
        self.signaling_channel = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub fn with_identity_provider<F>(mut self, factory: F) -> Self
    where
        F: Fn(&CollaboratorContext) -> Arc<dyn IdentityProvider> + Send + Sync + 'static,
    {
        self.identity_provider = Some(Arc::new(factory));
        self
    }

    /// Share one already-built channel with every façade.
    #[must_use]
    pub fn with_shared_signaling_channel(self, channel: Arc<dyn SignalingChannel>) -> Self {
        self.with_signaling_channel(move |_| Arc::clone(&channel))
    }

    /// Share one already-built provider with every façade.
    #[must_use]
    pub fn with_shared_identity_provider(self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.with_identity_provider(move |_| Arc::clone(&provider))
    }

    /// Roles without a factory, in resolution order.
    pub fn missing(&self) -> Vec<CollaboratorKind> {
        let mut missing = Vec::new();
        if self.signaling_channel.is_none() {
            missing.push(CollaboratorKind::SignalingChannel);
        }
        if self.identity_provider.is_none() {
            missing.push(CollaboratorKind::IdentityProvider);
        }
        missing
    }

    /// Build every collaborator for one façade.
    ///
    /// # Errors
    ///
    /// Returns [`MercuryError::UnresolvedCollaborator`] for the first role
    /// that has no factory.
    pub(crate) fn resolve(&self, ctx: &CollaboratorContext) -> Result<Resolved> {
        let signaling = self
            .signaling_channel
            .as_ref()
            .ok_or(MercuryError::UnresolvedCollaborator(
                CollaboratorKind::SignalingChannel,
            ))?;
        let identity = self
            .identity_provider
            .as_ref()
            .ok_or(MercuryError::UnresolvedCollaborator(
                CollaboratorKind::IdentityProvider,
            ))?;
        debug!(client_id = %ctx.client_id, "resolving collaborators");
        Ok(Resolved {
            signaling_channel: signaling(ctx),
            identity_provider: identity(ctx),
        })
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("signaling_channel", &self.signaling_channel.is_some())
            .field("identity_provider", &self.identity_provider.is_some())
            .finish()
    }
}

/// Collaborators built for one façade.
pub(crate) struct Resolved {
    pub(crate) signaling_channel: Arc<dyn SignalingChannel>,
    pub(crate) identity_provider: Arc<dyn IdentityProvider>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::identity::User;
    use async_trait::async_trait;

    struct NullChannel;

    #[async_trait]
    impl SignalingChannel for NullChannel {
        async fn open(&self) -> Result<()> {
            Ok(())
        }
        async fn close(&self) -> Result<()> {
            Ok(())
        }
        async fn send(&self, _message: String) -> Result<()> {
            Ok(())
        }
    }

    struct RejectAll;

    #[async_trait]
    impl IdentityProvider for RejectAll {
        async fn login(&self, account: &str, _token: &str) -> Result<User> {
            Err(MercuryError::LoginRejected {
                account: account.into(),
                reason: "nope".into(),
                error_code: None,
            })
        }
        async fn logout(&self, _account: &str, _token: &str) -> Result<()> {
            Ok(())
        }
    }

    fn ctx() -> CollaboratorContext {
        CollaboratorContext {
            client_id: ClientId::new(),
            app: AppSettings::default(),
        }
    }

    #[test]
    fn empty_set_reports_both_roles_missing() {
        let collaborators = Collaborators::new();
        assert_eq!(
            collaborators.missing(),
            vec![
                CollaboratorKind::SignalingChannel,
                CollaboratorKind::IdentityProvider
            ]
        );
        let err = collaborators.resolve(&ctx()).err().unwrap();
        assert!(matches!(
            err,
            MercuryError::UnresolvedCollaborator(CollaboratorKind::SignalingChannel)
        ));
    }

    #[test]
    fn missing_identity_provider_is_reported() {
        let collaborators =
            Collaborators::new().with_shared_signaling_channel(Arc::new(NullChannel));
        let err = collaborators.resolve(&ctx()).err().unwrap();
        assert_eq!(err.to_string(), "unresolved collaborator: identity provider");
    }

    #[test]
    fn factories_receive_client_id() {
        let seen = Arc::new(std::sync::Mutex::new(None));
        let record = Arc::clone(&seen);
        let collaborators = Collaborators::new()
            .with_signaling_channel(move |ctx| {
                *record.lock().unwrap() = Some(ctx.client_id);
                Arc::new(NullChannel)
            })
            .with_shared_identity_provider(Arc::new(RejectAll));

        let ctx = ctx();
        assert!(collaborators.resolve(&ctx).is_ok());
        assert_eq!(*seen.lock().unwrap(), Some(ctx.client_id));
    }
}
