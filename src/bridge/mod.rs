//! BLE radio bridge: session lifecycle and payload ferrying over a
//! platform-native short-range transport.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Radio Bridge                         │
//! │                                                            │
//! │  start / stop / publish ──▶ RadioTransport ──▶ native BLE  │
//! │                                                   │        │
//! │  Inbox ◀── EventChannel ◀── deliver / status ◀────┘        │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Session states
//!
//! `Idle ──start──▶ Started ──stop──▶ Idle`
//!
//! The bridge tracks this only for logging and introspection. It does not
//! reject a second `start` or a `publish` while idle: both are forwarded
//! and the native layer decides. There is no error state; failures after
//! `start` arrive as [`TransportStatus`] events on the inbox.
//!
//! `stop` closes the event channel and `start` reopens it, so deliveries
//! racing a stop never block the native thread.

pub mod channels;
pub mod transport;

pub use channels::{
    BridgeEvent, EventChannel, Inbox, InboundMessage, TransportStatus, deliver_message,
    report_status,
};
pub use transport::{BridgeError, NullRadio, RadioTransport};

use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    Idle,
    Started,
}

/// Thin lifecycle wrapper around a [`RadioTransport`].
pub struct RadioBridge<'a, T> {
    transport: T,
    events: &'a EventChannel,
    state: BridgeState,
}

impl<'a, T: RadioTransport> RadioBridge<'a, T> {
    /// `events` is the channel the transport's native callbacks feed.
    pub fn new(transport: T, events: &'a EventChannel) -> Self {
        Self {
            transport,
            events,
            state: BridgeState::Idle,
        }
    }

    /// Open a session for `client_id` with the peer `device_id`.
    ///
    /// Only marshaling failures are returned; connection problems show up
    /// later as status events.
    pub fn start(&mut self, client_id: &str, device_id: &str) -> Result<(), BridgeError> {
        if self.state == BridgeState::Started {
            warn!("RadioBridge: start while a session is active, native layer decides");
        }
        self.events.reopen();
        self.transport.begin_session(client_id, device_id)?;
        self.state = BridgeState::Started;
        info!(
            "RadioBridge: session started (client={}, peer={})",
            client_id, device_id
        );
        Ok(())
    }

    /// End the session. Safe to call when idle.
    ///
    /// The event channel is closed first, so a native thread blocked on a
    /// full channel is released before the native stop runs. Events still
    /// queued are discarded.
    pub fn stop(&mut self) {
        self.events.close();
        self.transport.end_session();
        if self.state == BridgeState::Started {
            info!("RadioBridge: session stopped");
        }
        self.state = BridgeState::Idle;
    }

    /// Submit `payload` to the connected peer. Empty payloads are skipped.
    pub fn publish(&mut self, payload: &[u8]) -> Result<(), BridgeError> {
        if payload.is_empty() {
            return Ok(());
        }
        if self.state == BridgeState::Idle {
            debug!("RadioBridge: publish of {}B with no active session", payload.len());
        }
        self.transport.send(payload)
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn is_started(&self) -> bool {
        self.state == BridgeState::Started
    }

    /// Reader for inbound messages and status events.
    pub fn inbox(&self) -> Inbox<'a> {
        Inbox::new(self.events)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

// ── Tests ────────────────────────────────────────────────────
