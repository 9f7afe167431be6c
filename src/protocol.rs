//! Wire types the façade itself puts on the signaling channel.
//!
//! Chat and call signaling payloads belong to the channel implementation;
//! the only message the façade originates is the presence announcement sent
//! when a user session starts or ends.

use serde::{Deserialize, Serialize};

use crate::identity::User;

/// Online status of a user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Online,
    #[default]
    Offline,
}

/// Presence announcement for one user account.
///
/// Serializes as `{"type":"presence","user_id":...,"account":...,"presence":...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename = "presence")]
pub struct PresenceMessage {
    /// Identity-provider ID of the user.
    pub user_id: String,
    /// Account the session is bound to.
    pub account: String,
    /// Announced status.
    pub presence: Presence,
}

impl PresenceMessage {
    /// Build an announcement of the user's current presence.
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.id().to_string(),
            account: user.session().user_account.clone(),
            presence: user.presence(),
        }
    }
}
