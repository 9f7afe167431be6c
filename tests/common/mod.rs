#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing,
    dead_code
)]
//! Shared test utilities for Mercury client integration tests.
//!
//! Provides recording mock collaborators and a helper that wires them into
//! a [`Collaborators`] set.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use mercury_client::protocol::PresenceMessage;
use mercury_client::{
    Collaborators, ErrorCode, IdentityProvider, MercuryError, SignalingChannel, User, UserSession,
};

// ── MockSignalingChannel ────────────────────────────────────────────

/// A signaling channel that records every call.
///
/// `open` fails while `fail_open` is set; `send` fails with
/// [`MercuryError::NotConnected`] unless the channel is open. A non-zero
/// `send_delay_ms` keeps `send` pending that long after recording.
#[derive(Default)]
pub struct MockSignalingChannel {
    pub open: AtomicBool,
    pub fail_open: AtomicBool,
    pub fail_close: AtomicBool,
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
    pub sent: StdMutex<Vec<String>>,
    pub send_delay_ms: AtomicU64,
}

impl MockSignalingChannel {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Presence messages sent so far, decoded.
    pub fn presence_sent(&self) -> Vec<PresenceMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|json| serde_json::from_str(json).expect("presence message"))
            .collect()
    }
}

#[async_trait]
impl SignalingChannel for MockSignalingChannel {
    async fn open(&self) -> Result<(), MercuryError> {
        self.opens.fetch_add(1, Ordering::Relaxed);
        if self.fail_open.load(Ordering::Relaxed) {
            return Err(MercuryError::SignalingOpen("connection refused".into()));
        }
        self.open.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn close(&self) -> Result<(), MercuryError> {
        self.closes.fetch_add(1, Ordering::Relaxed);
        self.open.store(false, Ordering::Relaxed);
        if self.fail_close.load(Ordering::Relaxed) {
            return Err(MercuryError::SignalingClose("close handshake timed out".into()));
        }
        Ok(())
    }

    async fn send(&self, message: String) -> Result<(), MercuryError> {
        if !self.open.load(Ordering::Relaxed) {
            return Err(MercuryError::NotConnected);
        }
        self.sent.lock().unwrap().push(message);
        pause(&self.send_delay_ms).await;
        Ok(())
    }
}

// ── MockIdentityProvider ────────────────────────────────────────────

/// An identity provider backed by an account → token table.
///
/// A non-zero `logout_delay_ms` keeps `logout` pending that long before it
/// records the call.
#[derive(Default)]
pub struct MockIdentityProvider {
    accounts: StdMutex<HashMap<String, String>>,
    pub fail_logout: AtomicBool,
    pub logout_delay_ms: AtomicU64,
    pub logouts: StdMutex<Vec<(String, String)>>,
}

impl MockIdentityProvider {
    /// A provider that accepts each `(account, token)` pair.
    pub fn with_accounts(accounts: &[(&str, &str)]) -> Arc<Self> {
        let provider = Self::default();
        {
            let mut table = provider.accounts.lock().unwrap();
            for (account, token) in accounts {
                table.insert((*account).to_string(), (*token).to_string());
            }
        }
        Arc::new(provider)
    }

    pub fn logged_out_accounts(&self) -> Vec<String> {
        self.logouts
            .lock()
            .unwrap()
            .iter()
            .map(|(account, _)| account.clone())
            .collect()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn login(&self, account: &str, token: &str) -> Result<User, MercuryError> {
        let expected = self.accounts.lock().unwrap().get(account).cloned();
        match expected {
            Some(expected) if expected == token => Ok(User::new(
                format!("user-{account}"),
                UserSession::new(account, token),
            )),
            Some(_) => Err(MercuryError::LoginRejected {
                account: account.into(),
                reason: "token mismatch".into(),
                error_code: Some(ErrorCode::InvalidToken),
            }),
            None => Err(MercuryError::LoginRejected {
                account: account.into(),
                reason: "unknown account".into(),
                error_code: Some(ErrorCode::InvalidCredentials),
            }),
        }
    }

    async fn logout(&self, account: &str, token: &str) -> Result<(), MercuryError> {
        pause(&self.logout_delay_ms).await;
        self.logouts
            .lock()
            .unwrap()
            .push((account.to_string(), token.to_string()));
        if self.fail_logout.load(Ordering::Relaxed) {
            return Err(MercuryError::LogoutFailed {
                account: account.into(),
                reason: "service unavailable".into(),
            });
        }
        Ok(())
    }
}

async fn pause(delay_ms: &AtomicU64) {
    let ms = delay_ms.load(Ordering::Relaxed);
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

// ── Wiring ──────────────────────────────────────────────────────────

/// Collaborators that hand every façade the same two mocks.
pub fn collaborators(
    channel: &Arc<MockSignalingChannel>,
    identity: &Arc<MockIdentityProvider>,
) -> Collaborators {
    Collaborators::new()
        .with_shared_signaling_channel(Arc::clone(channel) as Arc<dyn SignalingChannel>)
        .with_shared_identity_provider(Arc::clone(identity) as Arc<dyn IdentityProvider>)
}

/// Install a tracing subscriber honoring `RUST_LOG`; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
