//! Port traits: the boundary between provisioning/bridge logic and the
//! outside world.
//!
//! ```text
//!   OS keychain ──▶ SecretStore ──▶ SecretStoreSource ──▶ IdentityBundle
//!   native BLE  ──▶ EventChannel ──▶ Inbox ──▶ InboundHandler
//! ```
//!
//! ## Security notes
//!
//! - **SecretStore** implementations are read-only from this crate's point
//!   of view. Enrollment writes entries through a separate flow.
//! - Values come back as text (base64) exactly as stored; decoding is the
//!   caller's job so every backend shares one error path.

use core::fmt;

use crate::bridge::channels::TransportStatus;

// ───────────────────────────────────────────────────────────────
// Secret store port (driven adapter: OS keychain → provisioner)
// ───────────────────────────────────────────────────────────────

/// Named-entry lookup in an OS-managed secret store.
pub trait SecretStore {
    /// Fetch the text value stored under `(service, key)`.
    fn get(&self, service: &str, key: &str) -> Result<String, SecretStoreError>;
}

impl<S: SecretStore + ?Sized> SecretStore for &S {
    fn get(&self, service: &str, key: &str) -> Result<String, SecretStoreError> {
        (**self).get(service, key)
    }
}

// ───────────────────────────────────────────────────────────────
// Inbound handler port (bridge → application)
// ───────────────────────────────────────────────────────────────

/// Consumer of bridge events drained from an
/// [`Inbox`](crate::bridge::channels::Inbox).
///
/// Handlers run on the draining thread, never on the native radio thread.
pub trait InboundHandler {
    /// One received payload, exactly as the native layer delivered it.
    fn on_message(&mut self, device_id: &str, payload: &[u8]);

    /// Out-of-band transport status. Ignored by default.
    fn on_status(&mut self, status: &TransportStatus) {
        let _ = status;
    }
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`SecretStore`] lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretStoreError {
    /// No entry under that service/key.
    NotFound,
    /// The OS refused access (locked keychain, missing permission).
    AccessDenied,
    /// Any other backend failure, with the backend's description.
    Backend(String),
}

impl fmt::Display for SecretStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "entry not found"),
            Self::AccessDenied => write!(f, "access denied"),
            Self::Backend(msg) => write!(f, "backend error: {}", msg),
        }
    }
}

impl std::error::Error for SecretStoreError {}
