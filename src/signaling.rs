//! Signaling channel abstraction for the Mercury client.
//!
//! The [`SignalingChannel`] trait is the seam between the [`Client`](crate::Client)
//! façade and whatever transport actually talks to the signaling service
//! (XMPP over WebSocket, BOSH, a test loopback, ...). The façade only drives
//! the channel's lifecycle and hands it serialized JSON messages; framing,
//! reconnection and inbound dispatch are the channel's business.
//!
//! # Implementing a Custom Channel
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use mercury_client::error::MercuryError;
//! use mercury_client::signaling::SignalingChannel;
//!
//! struct MyChannel { /* ... */ }
//!
//! #[async_trait]
//! impl SignalingChannel for MyChannel {
//!     async fn open(&self) -> Result<(), MercuryError> {
//!         // Establish the transport connection
//!         Ok(())
//!     }
//!
//!     async fn close(&self) -> Result<(), MercuryError> {
//!         // Tear the connection down
//!         Ok(())
//!     }
//!
//!     async fn send(&self, message: String) -> Result<(), MercuryError> {
//!         // Deliver one complete JSON message
//!         Ok(())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::error::MercuryError;

/// A connection to the Mercury signaling service.
///
/// Channels are shared between the façade and the event layer, so every
/// method takes `&self`; implementations keep their own interior state.
///
/// # Object Safety
///
/// This trait is object-safe. The façade stores channels as
/// `Arc<dyn SignalingChannel>`.
#[async_trait]
pub trait SignalingChannel: Send + Sync + 'static {
    /// Begin the transport connection.
    ///
    /// # Errors
    ///
    /// Returns [`MercuryError::SignalingOpen`] if the connection could not be
    /// established.
    async fn open(&self) -> Result<(), MercuryError>;

    /// End the transport connection.
    ///
    /// Implementations should release resources even if the close handshake
    /// fails.
    ///
    /// # Errors
    ///
    /// Returns [`MercuryError::SignalingClose`] if the graceful shutdown fails.
    async fn close(&self) -> Result<(), MercuryError>;

    /// Send one JSON text message to the signaling service.
    ///
    /// # Errors
    ///
    /// Returns [`MercuryError::NotConnected`] if the channel is not open, or
    /// [`MercuryError::SignalingSend`] if delivery failed.
    async fn send(&self, message: String) -> Result<(), MercuryError>;
}
