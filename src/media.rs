//! Media defaults tracked by the façade: capture constraints and ICE servers.
//!
//! The call layer reads these when it negotiates a session; the façade only
//! stores them and hands out snapshots.

use serde::{Deserialize, Serialize};

/// Public STUN server used when no ICE servers are configured.
pub const DEFAULT_STUN_SERVER: &str = "stun:stun.l.google.com:19302";

/// Constraint on one capture track (audio or video).
///
/// Deserializes from either a bare boolean or a detailed object:
///
/// ```
/// use mercury_client::media::TrackConstraint;
///
/// let on: TrackConstraint = serde_json::from_str("true").unwrap();
/// assert!(on.is_requested());
///
/// let hd: TrackConstraint = serde_json::from_str(
///     r#"{"mandatory":{"minWidth":1280},"optional":[{"frameRate":30}]}"#,
/// ).unwrap();
/// assert!(hd.is_requested());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackConstraint {
    /// Request (or refuse) the track with browser defaults.
    Enabled(bool),
    /// Request the track with explicit requirements.
    Detailed {
        /// Requirements the device must satisfy.
        #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
        mandatory: serde_json::Map<String, serde_json::Value>,
        /// Preferences applied in order when possible.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        optional: Vec<serde_json::Map<String, serde_json::Value>>,
    },
}

impl TrackConstraint {
    /// Returns `true` unless the track is explicitly disabled.
    pub fn is_requested(&self) -> bool {
        !matches!(self, Self::Enabled(false))
    }
}

impl Default for TrackConstraint {
    fn default() -> Self {
        Self::Enabled(true)
    }
}

impl From<bool> for TrackConstraint {
    fn from(enabled: bool) -> Self {
        Self::Enabled(enabled)
    }
}

/// Capture-device request for a call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaConstraints {
    #[serde(default)]
    pub video: TrackConstraint,
    #[serde(default)]
    pub audio: TrackConstraint,
}

impl MediaConstraints {
    /// Constraints from plain on/off flags.
    pub fn new(video: bool, audio: bool) -> Self {
        Self {
            video: video.into(),
            audio: audio.into(),
        }
    }
}

/// One ICE server entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceServer {
    /// Server URL, e.g. `stun:host:port` or `turn:host:port`.
    #[serde(alias = "url")]
    pub urls: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServer {
    /// An ICE server without credentials.
    pub fn new(urls: impl Into<String>) -> Self {
        Self {
            urls: urls.into(),
            username: None,
            credential: None,
        }
    }

    /// Attach TURN credentials.
    #[must_use]
    pub fn with_credential(
        mut self,
        username: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.credential = Some(credential.into());
        self
    }
}

/// The built-in ICE server list.
pub fn default_ice_servers() -> Vec<IceServer> {
    vec![IceServer::new(DEFAULT_STUN_SERVER)]
}

/// Media defaults held by a [`Client`](crate::Client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaSettings {
    pub constraints: MediaConstraints,
    pub servers: Vec<IceServer>,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            constraints: MediaConstraints::default(),
            servers: default_ice_servers(),
        }
    }
}

impl MediaSettings {
    /// Replace whichever fields `update` carries; the rest are kept.
    pub fn apply(&mut self, update: MediaSettingsUpdate) {
        if let Some(constraints) = update.constraints {
            self.constraints = constraints;
        }
        if let Some(servers) = update.servers {
            self.servers = servers;
        }
    }
}

/// Partial replacement for [`MediaSettings`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSettingsUpdate {
    #[serde(default)]
    pub constraints: Option<MediaConstraints>,
    #[serde(default)]
    pub servers: Option<Vec<IceServer>>,
}

impl MediaSettingsUpdate {
    #[must_use]
    pub fn with_constraints(mut self, constraints: MediaConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    #[must_use]
    pub fn with_servers(mut self, servers: Vec<IceServer>) -> Self {
        self.servers = Some(servers);
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn defaults_request_audio_and_video() {
        let settings = MediaSettings::default();
        assert_eq!(settings.constraints, MediaConstraints::new(true, true));
        assert_eq!(settings.servers, vec![IceServer::new(DEFAULT_STUN_SERVER)]);
    }

    #[test]
    fn apply_replaces_only_present_fields() {
        let mut settings = MediaSettings::default();
        settings.apply(MediaSettingsUpdate::default().with_constraints(MediaConstraints::new(
            false, true,
        )));
        assert_eq!(settings.constraints, MediaConstraints::new(false, true));
        assert_eq!(settings.servers, default_ice_servers());

        let turn = vec![IceServer::new("turn:turn.example.com:3478").with_credential("u", "p")];
        settings.apply(MediaSettingsUpdate::default().with_servers(turn.clone()));
        assert_eq!(settings.servers, turn);
        assert_eq!(settings.constraints, MediaConstraints::new(false, true));
    }

    #[test]
    fn ice_server_accepts_legacy_url_key() {
        let server: IceServer =
            serde_json::from_str(r#"{"url":"turn:t.example.com","credential":"secret"}"#).unwrap();
        assert_eq!(server.urls, "turn:t.example.com");
        assert_eq!(server.credential.as_deref(), Some("secret"));
        assert!(server.username.is_none());
    }

    #[test]
    fn detailed_constraint_keeps_sub_fields() {
        let c: MediaConstraints = serde_json::from_str(
            r#"{"video":{"mandatory":{"maxWidth":640}},"audio":false}"#,
        )
        .unwrap();
        assert!(!c.audio.is_requested());
        match c.video {
            TrackConstraint::Detailed { mandatory, optional } => {
                assert_eq!(mandatory.get("maxWidth"), Some(&serde_json::json!(640)));
                assert!(optional.is_empty());
            }
            TrackConstraint::Enabled(_) => panic!("expected detailed constraint"),
        }
    }
}
