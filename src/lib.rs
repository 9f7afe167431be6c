//! # Mercury Client
//!
//! Client session and identity façade for the Mercury real-time
//! communication platform.
//!
//! A [`Client`] authenticates an application against the platform, logs
//! users in and out through a pluggable [`IdentityProvider`], keeps media
//! defaults (capture constraints, ICE servers) for the call layer, and
//! drives a pluggable [`SignalingChannel`].
//!
//! ## Features
//!
//! - **Collaborator-agnostic** — supply factories for the signaling channel
//!   and identity provider through [`Collaborators`]
//! - **Multiple sessions** — any number of accounts can be logged in at once
//! - **Explicit registry** — look façades up by [`ClientId`] in a
//!   [`ClientRegistry`] and remove them with [`Client::dispose`]
//! - **Browser-style config** — [`ClientConfig::from_json`] accepts the
//!   platform's JSON configuration object
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! let registry = ClientRegistry::new();
//! let client = mercury_client::connect(config, &collaborators, &registry).await?;
//! client.login("alice@example.com", "token").await?;
//! ```

pub mod client;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod error_codes;
pub mod event;
pub mod identity;
pub mod media;
pub mod protocol;
pub mod registry;
pub mod signaling;

// Re-export primary types for ergonomic imports.
pub use client::{connect, create_client, Client};
pub use collaborators::{CollaboratorKind, Collaborators};
pub use config::ClientConfig;
pub use error::MercuryError;
pub use error_codes::ErrorCode;
pub use event::{ClientEvent, EventHooks};
pub use identity::{IdentityProvider, User, UserSession};
pub use media::{IceServer, MediaConstraints, MediaSettings, MediaSettingsUpdate};
pub use registry::{get_client, ClientId, ClientRegistry};
pub use signaling::SignalingChannel;
