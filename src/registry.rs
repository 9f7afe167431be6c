//! Lookup of live [`Client`] façades by id.
//!
//! Collaborators are handed only a [`ClientId`] when they are constructed;
//! they find their façade again through a [`ClientRegistry`]. Entries are
//! added by [`Client::create`] and removed by [`Client::dispose`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::Client;

/// Process-unique identifier of a [`Client`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ClientId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ClientId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

type ClientMap = RwLock<HashMap<ClientId, Arc<Client>>>;

/// Shared map from [`ClientId`] to the façade that owns it.
///
/// Cloning is cheap; clones see the same entries.
#[derive(Clone, Default)]
pub struct ClientRegistry {
    clients: Arc<ClientMap>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `client` under its own id.
    ///
    /// Returns `false` (and leaves the existing entry in place) if the id is
    /// already registered.
    pub fn insert(&self, client: Arc<Client>) -> bool {
        let id = client.id();
        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        if clients.contains_key(&id) {
            warn!(client_id = %id, "client id already registered");
            return false;
        }
        clients.insert(id, client);
        debug!(client_id = %id, "client registered");
        true
    }

    /// Remove and return the client registered under `id`.
    pub fn remove(&self, id: &ClientId) -> Option<Arc<Client>> {
        let removed = self
            .clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        if removed.is_some() {
            debug!(client_id = %id, "client unregistered");
        }
        removed
    }

    /// Look up a client by id.
    pub fn get(&self, id: &ClientId) -> Option<Arc<Client>> {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn contains(&self, id: &ClientId) -> bool {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all registered clients, in no particular order.
    pub fn ids(&self) -> Vec<ClientId> {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    /// A non-owning handle, so a client can deregister itself without the
    /// registry and client keeping each other alive.
    pub(crate) fn downgrade(&self) -> RegistryHandle {
        RegistryHandle {
            clients: Arc::downgrade(&self.clients),
        }
    }
}

impl fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("clients", &self.len())
            .finish()
    }
}

/// Weak back-reference from a [`Client`] to the registry it lives in.
#[derive(Debug, Clone)]
pub(crate) struct RegistryHandle {
    clients: Weak<ClientMap>,
}

impl RegistryHandle {
    pub(crate) fn remove(&self, id: &ClientId) -> bool {
        let Some(clients) = self.clients.upgrade() else {
            return false;
        };
        let removed = clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id);
        removed.is_some()
    }
}

/// Look up a client by id, logging when the id is missing or unknown.
///
/// `None` as the id models a caller that has no id to offer; it is logged
/// and yields `None` rather than failing.
pub fn get_client(registry: &ClientRegistry, id: Option<&ClientId>) -> Option<Arc<Client>> {
    let Some(id) = id else {
        warn!("get_client called without a client id");
        return None;
    };
    let client = registry.get(id);
    if client.is_none() {
        warn!(client_id = %id, "no client registered under this id");
    }
    client
}
