//! The Mercury client façade.
//!
//! [`Client`] is the single entry point an application uses. It owns the
//! connection flag, the tracked user sessions and the media defaults, and
//! forwards the real work to the collaborators resolved at construction: a
//! [`SignalingChannel`] for transport and an [`IdentityProvider`] for
//! authentication.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = ClientRegistry::new();
//! let collaborators = Collaborators::new()
//!     .with_signaling_channel(|ctx| Arc::new(XmppChannel::new(ctx)))
//!     .with_identity_provider(|ctx| Arc::new(RestIdentity::new(ctx)));
//!
//! let client = mercury_client::connect(ClientConfig::new("a1"), &collaborators, &registry).await?;
//! let user = client.login("alice@example.com", "token").await?;
//! assert!(client.is_logged_in().await);
//!
//! client.logout(None).await;
//! client.disconnect().await?;
//! client.dispose();
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::collaborators::{CollaboratorContext, Collaborators};
use crate::config::{AppSettings, ClientConfig};
use crate::error::Result;
use crate::event::{ClientEvent, EventHooks};
use crate::identity::{IdentityProvider, User, UserSession};
use crate::media::{MediaSettings, MediaSettingsUpdate};
use crate::protocol::PresenceMessage;
use crate::registry::{ClientId, ClientRegistry, RegistryHandle};
use crate::signaling::SignalingChannel;

// ── Shared state ────────────────────────────────────────────────────

/// Mutable state behind a [`Client`].
struct ClientState {
    connected: AtomicBool,
    /// Logged-in users in login order; the last one is the current user.
    users: Mutex<Vec<User>>,
    media: RwLock<MediaSettings>,
}

impl ClientState {
    fn new(media: MediaSettings) -> Self {
        Self {
            connected: AtomicBool::new(false),
            users: Mutex::new(Vec::new()),
            media: RwLock::new(media),
        }
    }
}

// ── Client handle ───────────────────────────────────────────────────

/// Client façade for the Mercury platform.
///
/// Created via [`Client::create`] (or the module functions
/// [`create_client`] and [`connect`]), which registers it in a
/// [`ClientRegistry`] and returns it as an `Arc` so collaborators can share
/// it. Every method takes `&self`.
pub struct Client {
    id: ClientId,
    app: AppSettings,
    hooks: EventHooks,
    signaling_channel: Arc<dyn SignalingChannel>,
    identity_provider: Arc<dyn IdentityProvider>,
    state: ClientState,
    registry: RegistryHandle,
}

impl Client {
    /// Build a façade, resolve its collaborators and register it.
    ///
    /// # Errors
    ///
    /// Returns [`MercuryError::InvalidConfig`](crate::MercuryError::InvalidConfig)
    /// if the configuration fails validation, or
    /// [`MercuryError::UnresolvedCollaborator`](crate::MercuryError::UnresolvedCollaborator)
    /// if `collaborators` lacks a factory.
    pub fn create(
        config: ClientConfig,
        collaborators: &Collaborators,
        registry: &ClientRegistry,
    ) -> Result<Arc<Self>> {
        config.validate()?;

        let mut id = ClientId::new();
        while registry.contains(&id) {
            id = ClientId::new();
        }

        let app = config.app_settings();
        let ctx = CollaboratorContext {
            client_id: id,
            app: app.clone(),
        };
        let resolved = collaborators.resolve(&ctx)?;

        let client = Arc::new(Self {
            id,
            app,
            state: ClientState::new(config.media_settings()),
            hooks: config.hooks,
            signaling_channel: resolved.signaling_channel,
            identity_provider: resolved.identity_provider,
            registry: registry.downgrade(),
        });
        registry.insert(Arc::clone(&client));
        debug!(client_id = %id, "client created");

        Ok(client)
    }

    // ── Connection ──────────────────────────────────────────────────

    /// Open the signaling channel.
    ///
    /// The connected flag is set only once the channel reports success.
    ///
    /// # Errors
    ///
    /// Returns whatever the channel's `open` returned.
    pub async fn connect(&self) -> Result<()> {
        debug!(client_id = %self.id, "opening signaling channel");
        if let Err(e) = self.signaling_channel.open().await {
            warn!(client_id = %self.id, "signaling channel failed to open: {e}");
            return Err(e);
        }
        self.state.connected.store(true, Ordering::Release);
        info!(client_id = %self.id, "connected");
        Ok(())
    }

    /// Close the signaling channel.
    ///
    /// The connected flag is cleared even if the close handshake fails.
    ///
    /// # Errors
    ///
    /// Returns whatever the channel's `close` returned.
    pub async fn disconnect(&self) -> Result<()> {
        debug!(client_id = %self.id, "closing signaling channel");
        let result = self.signaling_channel.close().await;
        self.state.connected.store(false, Ordering::Release);
        match &result {
            Ok(()) => info!(client_id = %self.id, "disconnected"),
            Err(e) => warn!(client_id = %self.id, "signaling channel close failed: {e}"),
        }
        result
    }

    /// Returns `true` between a successful [`connect`](Self::connect) and the
    /// next [`disconnect`](Self::disconnect).
    pub fn is_connected(&self) -> bool {
        self.state.connected.load(Ordering::Acquire)
    }

    // ── Identity ────────────────────────────────────────────────────

    /// Log `account` in through the identity provider.
    ///
    /// On success the user is marked online, announced on the signaling
    /// channel, and becomes the current user (replacing any earlier session
    /// for the same account). On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns the identity provider's error unchanged.
    pub async fn login(&self, account: &str, token: &str) -> Result<User> {
        debug!(client_id = %self.id, account, "login requested");
        let mut user = match self.identity_provider.login(account, token).await {
            Ok(user) => user,
            Err(e) => {
                error!(client_id = %self.id, account, "login failed: {e}");
                return Err(e);
            }
        };

        user.set_online();
        {
            let mut users = self.state.users.lock().await;
            let session_account = user.session().user_account.clone();
            users.retain(|u| u.session().user_account != session_account);
            users.push(user.clone());
        }
        // An announced user must already be tracked.
        self.announce(&user).await;
        info!(client_id = %self.id, account, user_id = user.id(), "login succeeded");

        Ok(user)
    }

    /// End tracked sessions.
    ///
    /// With `None` every session ends; otherwise only sessions whose account
    /// is listed. Each ended session is logged out through the identity
    /// provider (failures are logged, not returned), dropped, marked logged
    /// out and announced offline. Does nothing when no one is logged in.
    ///
    /// A session stays tracked until its provider logout has returned, so a
    /// logout abandoned mid-way leaves the remaining sessions in place for a
    /// later call.
    ///
    /// Returns the sessions that were ended, in login order.
    pub async fn logout(&self, usernames: Option<&[&str]>) -> Vec<UserSession> {
        let matched: Vec<User> = {
            let users = self.state.users.lock().await;
            if users.is_empty() {
                debug!(client_id = %self.id, "logout: no user logged in");
                return Vec::new();
            }
            users
                .iter()
                .filter(|u| {
                    usernames.is_none_or(|names| names.iter().any(|n| *n == u.session().user_account))
                })
                .cloned()
                .collect()
        };

        let mut sessions = Vec::with_capacity(matched.len());
        for mut user in matched {
            let account = user.session().user_account.clone();
            let token = user.session().token.clone();
            if let Err(e) = self.identity_provider.logout(&account, &token).await {
                warn!(client_id = %self.id, account, "identity provider logout failed: {e}");
            }
            self.state.users.lock().await.retain(|u| {
                u.session().user_account != account || u.session().token != token
            });

            user.session_mut().logged_in = false;
            user.set_offline();
            self.announce(&user).await;
            info!(client_id = %self.id, account, "logged out");
            sessions.push(user.session().clone());
        }
        sessions
    }

    /// Returns `true` if any tracked session is logged in.
    pub async fn is_logged_in(&self) -> bool {
        self.state
            .users
            .lock()
            .await
            .iter()
            .any(|u| u.session().is_logged_in())
    }

    /// The most recently logged-in user still tracked.
    pub async fn current_user(&self) -> Option<User> {
        self.state.users.lock().await.last().cloned()
    }

    /// Tracked sessions in login order.
    pub async fn sessions(&self) -> Vec<UserSession> {
        self.state
            .users
            .lock()
            .await
            .iter()
            .map(|u| u.session().clone())
            .collect()
    }

    // ── Media ───────────────────────────────────────────────────────

    /// Snapshot of the current media settings.
    pub fn media_settings(&self) -> MediaSettings {
        self.state
            .media
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the constraints and/or ICE servers carried by `update`.
    pub fn set_default_media_settings(&self, update: MediaSettingsUpdate) {
        self.state
            .media
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(update);
        debug!(client_id = %self.id, "media settings updated");
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn app_settings(&self) -> &AppSettings {
        &self.app
    }

    pub fn signaling_channel(&self) -> Arc<dyn SignalingChannel> {
        Arc::clone(&self.signaling_channel)
    }

    pub fn identity_provider(&self) -> Arc<dyn IdentityProvider> {
        Arc::clone(&self.identity_provider)
    }

    /// Route `event` to the application's hook for its kind.
    ///
    /// Returns `false` if the application registered no hook for it.
    pub fn emit(&self, event: ClientEvent) -> bool {
        self.hooks.dispatch(&event)
    }

    /// Remove this client from its registry.
    ///
    /// Returns `false` if it was already removed. The façade itself keeps
    /// working for holders of the `Arc`.
    pub fn dispose(&self) -> bool {
        let removed = self.registry.remove(&self.id);
        if removed {
            debug!(client_id = %self.id, "client disposed");
        }
        removed
    }

    // ── Internal helpers ────────────────────────────────────────────

    /// Send the user's presence on the signaling channel, logging failures.
    async fn announce(&self, user: &User) {
        if !self.is_connected() {
            debug!(client_id = %self.id, "not connected, skipping presence announcement");
            return;
        }
        let message = PresenceMessage::for_user(user);
        let json = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(e) => {
                error!("failed to serialize PresenceMessage: {e}");
                return;
            }
        };
        if let Err(e) = self.signaling_channel.send(json).await {
            warn!(
                client_id = %self.id,
                account = %message.account,
                "presence announcement failed: {e}"
            );
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("id", &self.id)
            .field("connected", &self.is_connected())
            .field("app_id", &self.app.app_id)
            .field("hooks", &self.hooks)
            .finish()
    }
}

// ── Module-level factories ──────────────────────────────────────────

/// Construct and register a client without connecting it.
///
/// # Errors
///
/// See [`Client::create`].
pub fn create_client(
    config: ClientConfig,
    collaborators: &Collaborators,
    registry: &ClientRegistry,
) -> Result<Arc<Client>> {
    Client::create(config, collaborators, registry)
}

/// Construct, register and immediately connect a client.
///
/// If the channel fails to open the client is disposed before the error is
/// returned.
///
/// # Errors
///
/// See [`Client::create`] and [`Client::connect`].
pub async fn connect(
    config: ClientConfig,
    collaborators: &Collaborators,
    registry: &ClientRegistry,
) -> Result<Arc<Client>> {
    let client = Client::create(config, collaborators, registry)?;
    if let Err(e) = client.connect().await {
        client.dispose();
        return Err(e);
    }
    Ok(client)
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::error::MercuryError;
    use crate::identity::UserSession;
    use crate::media::{IceServer, MediaConstraints};
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;

    // ── Mock collaborators ──────────────────────────────────────────

    /// Records sent messages; `open` fails when `fail_open` is set.
    #[derive(Default)]
    struct MockChannel {
        fail_open: bool,
        sent: StdMutex<Vec<String>>,
    }

    #[async_trait]
    impl SignalingChannel for MockChannel {
        async fn open(&self) -> Result<()> {
            if self.fail_open {
                return Err(MercuryError::SignalingOpen("refused".into()));
            }
            Ok(())
        }

        async fn close(&self) -> Result<()> {
            Ok(())
        }

        async fn send(&self, message: String) -> Result<()> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    /// Accepts any token except `"bad"`.
    #[derive(Default)]
    struct MockIdentity {
        logouts: StdMutex<Vec<String>>,
    }

    #[async_trait]
    impl IdentityProvider for MockIdentity {
        async fn login(&self, account: &str, token: &str) -> Result<User> {
            if token == "bad" {
                return Err(MercuryError::LoginRejected {
                    account: account.into(),
                    reason: "bad token".into(),
                    error_code: None,
                });
            }
            Ok(User::new(
                format!("id-{account}"),
                UserSession::new(account, token),
            ))
        }

        async fn logout(&self, account: &str, _token: &str) -> Result<()> {
            self.logouts.lock().unwrap().push(account.into());
            Ok(())
        }
    }

    fn setup(channel: MockChannel) -> (Arc<Client>, Arc<MockChannel>, Arc<MockIdentity>) {
        let channel = Arc::new(channel);
        let identity = Arc::new(MockIdentity::default());
        let collaborators = Collaborators::new()
            .with_shared_signaling_channel(Arc::clone(&channel) as Arc<dyn SignalingChannel>)
            .with_shared_identity_provider(Arc::clone(&identity) as Arc<dyn IdentityProvider>);
        let registry = ClientRegistry::new();
        let client = Client::create(ClientConfig::new("a1"), &collaborators, &registry).unwrap();
        (client, channel, identity)
    }

    // ── Tests ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn fresh_client_is_disconnected_and_logged_out() {
        let (client, _channel, _identity) = setup(MockChannel::default());
        assert!(!client.is_connected());
        assert!(!client.is_logged_in().await);
        assert!(client.current_user().await.is_none());
    }

    #[tokio::test]
    async fn connect_then_disconnect_toggles_flag() {
        let (client, _channel, _identity) = setup(MockChannel::default());
        client.connect().await.unwrap();
        assert!(client.is_connected());
        client.disconnect().await.unwrap();
        assert!(!client.is_connected());
        client.connect().await.unwrap();
        client.connect().await.unwrap();
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn failed_open_leaves_client_disconnected() {
        let (client, _channel, _identity) = setup(MockChannel {
            fail_open: true,
            ..Default::default()
        });
        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, MercuryError::SignalingOpen(_)));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn login_announces_presence_when_connected() {
        let (client, channel, _identity) = setup(MockChannel::default());
        client.connect().await.unwrap();

        let user = client.login("alice", "tok").await.unwrap();
        assert_eq!(user.id(), "id-alice");
        assert!(client.is_logged_in().await);

        let sent = channel.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let msg: PresenceMessage = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(msg.account, "alice");
        assert_eq!(msg.presence, crate::protocol::Presence::Online);
    }

    #[tokio::test]
    async fn login_while_disconnected_skips_announcement() {
        let (client, channel, _identity) = setup(MockChannel::default());
        client.login("alice", "tok").await.unwrap();
        assert!(client.is_logged_in().await);
        assert!(channel.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_login_leaves_state_unchanged() {
        let (client, _channel, _identity) = setup(MockChannel::default());
        client.login("alice", "tok").await.unwrap();

        let err = client.login("bob", "bad").await.unwrap_err();
        assert!(matches!(err, MercuryError::LoginRejected { ref account, .. } if account == "bob"));
        assert_eq!(client.current_user().await.unwrap().id(), "id-alice");
        assert_eq!(client.sessions().await.len(), 1);
    }

    #[tokio::test]
    async fn relogin_replaces_session_for_same_account() {
        let (client, _channel, _identity) = setup(MockChannel::default());
        client.login("alice", "t1").await.unwrap();
        client.login("bob", "t2").await.unwrap();
        client.login("alice", "t3").await.unwrap();

        let sessions = client.sessions().await;
        let accounts: Vec<&str> = sessions.iter().map(|s| s.user_account.as_str()).collect();
        assert_eq!(accounts, vec!["bob", "alice"]);
        assert_eq!(sessions[1].token, "t3");
    }

    #[tokio::test]
    async fn logout_without_user_is_noop() {
        let (client, _channel, identity) = setup(MockChannel::default());
        assert!(client.logout(None).await.is_empty());
        assert!(identity.logouts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn partial_logout_falls_back_to_previous_user() {
        let (client, _channel, identity) = setup(MockChannel::default());
        client.login("alice", "t1").await.unwrap();
        client.login("bob", "t2").await.unwrap();

        let ended = client.logout(Some(&["bob"])).await;
        assert_eq!(ended.len(), 1);
        assert!(!ended[0].is_logged_in());
        assert_eq!(*identity.logouts.lock().unwrap(), vec!["bob".to_string()]);
        assert_eq!(client.current_user().await.unwrap().id(), "id-alice");
        assert!(client.is_logged_in().await);

        client.logout(Some(&["carol"])).await;
        assert!(client.is_logged_in().await);

        client.logout(None).await;
        assert!(!client.is_logged_in().await);
        assert!(client.current_user().await.is_none());
    }

    #[tokio::test]
    async fn media_settings_are_snapshots() {
        let (client, _channel, _identity) = setup(MockChannel::default());
        let mut snapshot = client.media_settings();
        snapshot.servers.clear();
        assert_eq!(client.media_settings(), MediaSettings::default());

        client.set_default_media_settings(
            MediaSettingsUpdate::default().with_constraints(MediaConstraints::new(true, false)),
        );
        let settings = client.media_settings();
        assert_eq!(settings.constraints, MediaConstraints::new(true, false));
        assert_eq!(settings.servers, MediaSettings::default().servers);

        let servers = vec![IceServer::new("turn:turn.example.com")];
        client.set_default_media_settings(MediaSettingsUpdate::default().with_servers(servers.clone()));
        let settings = client.media_settings();
        assert_eq!(settings.servers, servers);
        assert_eq!(settings.constraints, MediaConstraints::new(true, false));
    }

    #[tokio::test]
    async fn module_connect_disposes_on_open_failure() {
        let collaborators = Collaborators::new()
            .with_signaling_channel(|_| {
                Arc::new(MockChannel {
                    fail_open: true,
                    ..Default::default()
                })
            })
            .with_identity_provider(|_| Arc::new(MockIdentity::default()));
        let registry = ClientRegistry::new();

        let err = connect(ClientConfig::new("a1"), &collaborators, &registry)
            .await
            .unwrap_err();
        assert!(matches!(err, MercuryError::SignalingOpen(_)));
        assert!(registry.is_empty());
    }
}
