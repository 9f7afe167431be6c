//! Configuration for a [`Client`](crate::Client).
//!
//! [`ClientConfig`] can be built in code with the `with_*` methods or loaded
//! from the browser-style JSON object the platform's other SDKs accept:
//!
//! ```
//! use mercury_client::config::ClientConfig;
//!
//! let config = ClientConfig::from_json(
//!     r#"{"appId":"a1","baseURL":"https://api.example.com","constraints":{"video":true,"audio":false}}"#,
//! ).unwrap();
//! assert_eq!(config.app_id.as_deref(), Some("a1"));
//! ```
//!
//! Event hooks cannot be expressed in JSON; attach them afterwards with
//! [`ClientConfig::with_hooks`].

use serde::Deserialize;

use crate::error::{MercuryError, Result};
use crate::event::EventHooks;
use crate::media::{IceServer, MediaConstraints, MediaSettings};

/// Configuration for a [`Client`](crate::Client).
///
/// Every field is optional. Media fields left unset fall back to
/// [`MediaSettings::default`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Application ID registered with the platform.
    #[serde(default)]
    pub app_id: Option<String>,
    /// Application key paired with `app_id`.
    #[serde(default)]
    pub app_key: Option<String>,
    /// Base URL of the platform's REST and signaling endpoints.
    #[serde(default, rename = "baseURL")]
    pub base_url: Option<String>,
    /// Pre-issued application auth token.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Capture constraints overriding the default.
    #[serde(default)]
    pub constraints: Option<MediaConstraints>,
    /// ICE servers overriding the default list.
    #[serde(default)]
    pub servers: Option<Vec<IceServer>>,
    /// Application callbacks.
    #[serde(skip)]
    pub hooks: EventHooks,
}

impl ClientConfig {
    /// Create a configuration identifying the given application.
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: Some(app_id.into()),
            ..Default::default()
        }
    }

    /// Parse a JSON configuration object.
    ///
    /// # Errors
    ///
    /// Returns [`MercuryError::Serialization`] if the JSON is malformed, or
    /// [`MercuryError::InvalidConfig`] if a present field is empty.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject fields that are present but blank.
    ///
    /// # Errors
    ///
    /// Returns [`MercuryError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("appId", &self.app_id),
            ("appKey", &self.app_key),
            ("baseURL", &self.base_url),
            ("authToken", &self.auth_token),
        ];
        for (name, value) in fields {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(MercuryError::InvalidConfig(format!("{name} is empty")));
            }
        }
        if let Some(servers) = &self.servers {
            if servers.iter().any(|s| s.urls.trim().is_empty()) {
                return Err(MercuryError::InvalidConfig(
                    "ICE server entry has an empty URL".into(),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn with_app_key(mut self, app_key: impl Into<String>) -> Self {
        self.app_key = Some(app_key.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_auth_token(mut self, auth_token: impl Into<String>) -> Self {
        self.auth_token = Some(auth_token.into());
        self
    }

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

    #[must_use]
    pub fn with_hooks(mut self, hooks: EventHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// The media settings this configuration produces.
    pub fn media_settings(&self) -> MediaSettings {
        let defaults = MediaSettings::default();
        MediaSettings {
            constraints: self.constraints.clone().unwrap_or(defaults.constraints),
            servers: self.servers.clone().unwrap_or(defaults.servers),
        }
    }

    /// The application identity handed to collaborators.
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            app_id: self.app_id.clone(),
            app_key: self.app_key.clone(),
            base_url: self.base_url.clone(),
            auth_token: self.auth_token.clone(),
        }
    }
}

/// Application identity shared with the signaling channel and identity
/// provider when they are constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppSettings {
    pub app_id: Option<String>,
    pub app_key: Option<String>,
    pub base_url: Option<String>,
    pub auth_token: Option<String>,
}
