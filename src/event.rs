//! Application-facing events and the callback hooks that receive them.
//!
//! The façade does not generate most of these itself: the signaling channel
//! and call layer look the client up by id and pass what they observe to
//! [`Client::emit`](crate::Client::emit), which routes each event to the
//! matching hook in [`EventHooks`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

/// Something the application may want to react to.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// An operation completed successfully.
    Success { detail: String },
    /// An operation failed.
    Error { message: String },
    /// A peer joined a room or conversation.
    Join { room: String, account: String },
    /// A peer left a room or conversation.
    Leave { room: String, account: String },
    /// A chat or data message arrived.
    Message {
        from: String,
        body: serde_json::Value,
    },
    /// The signaling connection dropped.
    Disconnect { reason: Option<String> },
    /// The signaling connection was re-established.
    Reconnect,
    /// A remote party is calling.
    Call { from: String, call_id: String },
    /// A peer-to-peer data connection was offered.
    DirectConnection { from: String },
}

impl ClientEvent {
    /// Which hook handles this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Success { .. } => EventKind::Success,
            Self::Error { .. } => EventKind::Error,
            Self::Join { .. } => EventKind::Join,
            Self::Leave { .. } => EventKind::Leave,
            Self::Message { .. } => EventKind::Message,
            Self::Disconnect { .. } => EventKind::Disconnect,
            Self::Reconnect => EventKind::Reconnect,
            Self::Call { .. } => EventKind::Call,
            Self::DirectConnection { .. } => EventKind::DirectConnection,
        }
    }
}

/// Names of the hooks an application can register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Success,
    Error,
    Join,
    Leave,
    Message,
    Disconnect,
    Reconnect,
    Call,
    DirectConnection,
}

/// A registered callback.
pub type EventHook = Arc<dyn Fn(&ClientEvent) + Send + Sync>;

/// The application's callbacks, at most one per [`EventKind`].
///
/// ```
/// use mercury_client::event::{ClientEvent, EventHooks};
///
/// let hooks = EventHooks::new()
///     .on_message(|event| println!("got {event:?}"))
///     .on_disconnect(|_| println!("lost connection"));
/// assert!(!hooks.dispatch(&ClientEvent::Reconnect));
/// ```
#[derive(Clone, Default)]
pub struct EventHooks {
    hooks: HashMap<EventKind, EventHook>,
}

impl EventHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `hook` for `kind`, replacing any previous one.
    #[must_use]
    pub fn on<F>(mut self, kind: EventKind, hook: F) -> Self
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.hooks.insert(kind, Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_success<F>(self, hook: F) -> Self
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::Success, hook)
    }

    #[must_use]
    pub fn on_error<F>(self, hook: F) -> Self
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::Error, hook)
    }

    #[must_use]
    pub fn on_join<F>(self, hook: F) -> Self
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::Join, hook)
    }

    #[must_use]
    pub fn on_leave<F>(self, hook: F) -> Self
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::Leave, hook)
    }

    #[must_use]
    pub fn on_message<F>(self, hook: F) -> Self
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::Message, hook)
    }

    #[must_use]
    pub fn on_disconnect<F>(self, hook: F) -> Self
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::Disconnect, hook)
    }

    #[must_use]
    pub fn on_reconnect<F>(self, hook: F) -> Self
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::Reconnect, hook)
    }

    #[must_use]
    pub fn on_call<F>(self, hook: F) -> Self
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::Call, hook)
    }

    #[must_use]
    pub fn on_direct_connection<F>(self, hook: F) -> Self
    where
        F: Fn(&ClientEvent) + Send + Sync + 'static,
    {
        self.on(EventKind::DirectConnection, hook)
    }

    pub fn contains(&self, kind: EventKind) -> bool {
        self.hooks.contains_key(&kind)
    }

    /// Invoke the hook registered for the event's kind.
    ///
    /// Returns `false` if no hook was registered; the event is dropped.
    pub fn dispatch(&self, event: &ClientEvent) -> bool {
        match self.hooks.get(&event.kind()) {
            Some(hook) => {
                hook(event);
                true
            }
            None => {
                debug!("no hook registered for {:?}, dropping event", event.kind());
                false
            }
        }
    }
}

impl fmt::Debug for EventHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<String> = self.hooks.keys().map(|k| format!("{k:?}")).collect();
        kinds.sort();
        f.debug_struct("EventHooks").field("registered", &kinds).finish()
    }
}
