//! Native radio transport abstraction.
//!
//! Concrete implementations:
//! - platform BLEBridge library over FFI (`adapters::native_ble`)
//! - [`NullRadio`] when no radio is compiled in or BLE is switched off
//! - recording mocks in tests
//!
//! The [`RadioBridge`](super::RadioBridge) is generic over
//! `RadioTransport`, so a new platform needs no change to bridge logic.
//!
//! Calls hand work to the native layer and return promptly. The only
//! errors they report are marshaling failures; link-level failures arrive
//! later as [`TransportStatus`](super::channels::TransportStatus) events.

use core::fmt;

/// Outbound half of the native BLE bridge.
pub trait RadioTransport {
    /// Begin a session binding `client_id` to the peer `device_id`.
    fn begin_session(&mut self, client_id: &str, device_id: &str) -> Result<(), BridgeError>;

    /// End the active session. Must be safe with no session active.
    fn end_session(&mut self);

    /// Submit one non-empty payload for delivery to the connected peer.
    fn send(&mut self, payload: &[u8]) -> Result<(), BridgeError>;
}

/// A transport that accepts and discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRadio;

impl RadioTransport for NullRadio {
    fn begin_session(&mut self, _client_id: &str, _device_id: &str) -> Result<(), BridgeError> {
        Ok(())
    }

    fn end_session(&mut self) {}

    fn send(&mut self, _payload: &[u8]) -> Result<(), BridgeError> {
        Ok(())
    }
}

// ── Error type ───────────────────────────────────────────────

/// Failure to marshal a call across the native boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// A text argument contains an interior NUL and cannot become a C string.
    InteriorNul { field: &'static str },
    /// The payload length does not fit the native length type.
    PayloadTooLarge { len: usize },
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InteriorNul { field } => {
                write!(f, "BLE bridge: {} contains an interior NUL byte", field)
            }
            Self::PayloadTooLarge { len } => {
                write!(f, "BLE bridge: payload of {} bytes exceeds native limit", len)
            }
        }
    }
}

impl std::error::Error for BridgeError {}
