//! Error types for the Mercury client.

use thiserror::Error;

use crate::collaborators::CollaboratorKind;
use crate::error_codes::ErrorCode;

/// Errors that can occur when using the Mercury client.
#[derive(Debug, Error)]
pub enum MercuryError {
    /// No factory was supplied for a required collaborator.
    #[error("unresolved collaborator: {0}")]
    UnresolvedCollaborator(CollaboratorKind),

    /// The signaling channel failed to open.
    #[error("signaling open error: {0}")]
    SignalingOpen(String),

    /// The signaling channel failed to close gracefully.
    #[error("signaling close error: {0}")]
    SignalingClose(String),

    /// Failed to send a message through the signaling channel.
    #[error("signaling send error: {0}")]
    SignalingSend(String),

    /// Attempted an operation that requires an open signaling channel.
    #[error("not connected to signaling service")]
    NotConnected,

    /// The identity provider rejected a login.
    #[error("login rejected for {account}: {reason}")]
    LoginRejected {
        /// Account that attempted to log in.
        account: String,
        /// Human-readable reason from the identity provider.
        reason: String,
        /// Structured error code, if provided.
        error_code: Option<ErrorCode>,
    },

    /// The identity provider failed to end a session.
    #[error("logout failed for {account}: {reason}")]
    LogoutFailed {
        /// Account whose session could not be ended.
        account: String,
        /// Human-readable reason from the identity provider.
        reason: String,
    },

    /// Failed to serialize or deserialize a message or configuration.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The supplied configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MercuryError {
    /// Returns the structured error code attached to this error, if any.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::LoginRejected { error_code, .. } => *error_code,
            _ => None,
        }
    }
}

/// A specialized [`Result`] type for Mercury client operations.
pub type Result<T> = std::result::Result<T, MercuryError>;
