//! # Loopback Login Example
//!
//! Wires a [`Client`](mercury_client::Client) to an in-process signaling
//! channel and a fixed-table identity provider, then walks through connect,
//! two logins, a partial logout and disconnect.
//!
//! ## Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --example loopback_login
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mercury_client::{
    ClientConfig, ClientRegistry, Collaborators, ErrorCode, IdentityProvider, MercuryError,
    SignalingChannel, User, UserSession,
};
use tokio::sync::mpsc;

// ─────────────────────────────────────────────────────────────────────
// Step 1: a channel that forwards every message to an mpsc "server"
// ─────────────────────────────────────────────────────────────────────

struct LoopbackChannel {
    open: AtomicBool,
    tx: mpsc::UnboundedSender<String>,
}

#[async_trait]
impl SignalingChannel for LoopbackChannel {
    async fn open(&self) -> Result<(), MercuryError> {
        self.open.store(true, Ordering::Release);
        Ok(())
    }

    async fn close(&self) -> Result<(), MercuryError> {
        self.open.store(false, Ordering::Release);
        Ok(())
    }

    async fn send(&self, message: String) -> Result<(), MercuryError> {
        if !self.open.load(Ordering::Acquire) {
            return Err(MercuryError::NotConnected);
        }
        self.tx
            .send(message)
            .map_err(|e| MercuryError::SignalingSend(e.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────
// Step 2: an identity provider with a fixed account table
// ─────────────────────────────────────────────────────────────────────

struct TableIdentity {
    tokens: HashMap<&'static str, &'static str>,
}

#[async_trait]
impl IdentityProvider for TableIdentity {
    async fn login(&self, account: &str, token: &str) -> Result<User, MercuryError> {
        match self.tokens.get(account) {
            Some(expected) if *expected == token => Ok(User::new(
                format!("u-{account}"),
                UserSession::new(account, token),
            )),
            _ => Err(MercuryError::LoginRejected {
                account: account.into(),
                reason: "unknown account or token".into(),
                error_code: Some(ErrorCode::InvalidCredentials),
            }),
        }
    }

    async fn logout(&self, _account: &str, _token: &str) -> Result<(), MercuryError> {
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Step 3: drive the façade
// ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), MercuryError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let (tx, mut server_rx) = mpsc::unbounded_channel();
    let channel: Arc<dyn SignalingChannel> = Arc::new(LoopbackChannel {
        open: AtomicBool::new(false),
        tx,
    });
    let identity: Arc<dyn IdentityProvider> = Arc::new(TableIdentity {
        tokens: HashMap::from([("alice", "a-token"), ("bob", "b-token")]),
    });
    let collaborators = Collaborators::new()
        .with_shared_signaling_channel(channel)
        .with_shared_identity_provider(identity);

    let registry = ClientRegistry::new();
    let client = mercury_client::connect(
        ClientConfig::from_json(r#"{"appId":"demo","constraints":{"video":false,"audio":true}}"#)?,
        &collaborators,
        &registry,
    )
    .await?;
    println!("client {} connected", client.id());

    client.login("alice", "a-token").await?;
    client.login("bob", "b-token").await?;
    if let Err(e) = client.login("mallory", "guess").await {
        println!("rejected as expected: {e}");
    }

    client.logout(Some(&["bob"])).await;
    if let Some(user) = client.current_user().await {
        println!("current user is now {}", user.id());
    }

    client.logout(None).await;
    client.disconnect().await?;
    client.dispose();

    while let Ok(message) = server_rx.try_recv() {
        println!("server received: {message}");
    }

    Ok(())
}
