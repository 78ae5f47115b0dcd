//! Device identity bundle: the resolved credential set.
//!
//! A bundle only exists after a resolution succeeded, so consumers never
//! observe a half-populated identity. It is handed to TLS setup and the
//! radio bridge by value (or behind an `Arc`), never through globals.
//!
//! ## Fields
//!
//! | Field       | Keychain entry | Dev file        | Embedded key |
//! |-------------|----------------|-----------------|--------------|
//! | device id   | `DeviceID`     | `device_id.txt` | `device_id`  |
//! | certificate | `Cert`         | `cert.pem`      | `cert`       |
//! | private key | `Key`          | `key.pem`       | `key`        |
//! | CA cert     | `CA`           | `ca.crt`        | `ca_cert`    |
//! | group key   | `GroupKey`     | `group_key.enc` | `group_key`  |

use core::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{ProvisionError, Result};

/// One of the five identity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DeviceId,
    Cert,
    Key,
    CaCert,
    GroupKey,
}

impl Field {
    /// Keychain read order.
    pub const ALL: [Field; 5] = [
        Field::DeviceId,
        Field::CaCert,
        Field::Cert,
        Field::Key,
        Field::GroupKey,
    ];

    /// Entry name in the OS secret store.
    pub const fn keychain_key(self) -> &'static str {
        match self {
            Self::DeviceId => "DeviceID",
            Self::Cert => "Cert",
            Self::Key => "Key",
            Self::CaCert => "CA",
            Self::GroupKey => "GroupKey",
        }
    }

    /// File name inside the developer certificate directory.
    pub const fn dev_file(self) -> &'static str {
        match self {
            Self::DeviceId => "device_id.txt",
            Self::Cert => "cert.pem",
            Self::Key => "key.pem",
            Self::CaCert => "ca.crt",
            Self::GroupKey => "group_key.enc",
        }
    }

    /// JSON key in the embedded record.
    pub const fn record_key(self) -> &'static str {
        match self {
            Self::DeviceId => "device_id",
            Self::Cert => "cert",
            Self::Key => "key",
            Self::CaCert => "ca_cert",
            Self::GroupKey => "group_key",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::DeviceId => "device id",
            Self::Cert => "certificate",
            Self::Key => "private key",
            Self::CaCert => "CA certificate",
            Self::GroupKey => "group key",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved device identity. PEM blobs are transported as opaque bytes;
/// parsing them is the TLS consumer's job.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct IdentityBundle {
    device_id: String,
    cert_pem: Vec<u8>,
    key_pem: Vec<u8>,
    ca_pem: Vec<u8>,
    group_key: Vec<u8>,
}

impl IdentityBundle {
    /// Build a bundle from fully resolved parts.
    ///
    /// `origin` labels the source in the empty-device-id error. Every
    /// field must be non-empty.
    pub fn assemble(
        origin: &'static str,
        device_id: String,
        cert_pem: Vec<u8>,
        key_pem: Vec<u8>,
        ca_pem: Vec<u8>,
        group_key: Vec<u8>,
    ) -> Result<Self> {
        let bundle = Self {
            device_id,
            cert_pem,
            key_pem,
            ca_pem,
            group_key,
        };
        match bundle.missing_field() {
            None => Ok(bundle),
            Some(Field::DeviceId) => Err(ProvisionError::EmptyDeviceId { origin }),
            Some(field) => Err(ProvisionError::IncompleteBundle { field }),
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn cert_pem(&self) -> &[u8] {
        &self.cert_pem
    }

    pub fn key_pem(&self) -> &[u8] {
        &self.key_pem
    }

    pub fn ca_pem(&self) -> &[u8] {
        &self.ca_pem
    }

    pub fn group_key(&self) -> &[u8] {
        &self.group_key
    }

    /// First empty field in [`Field::ALL`] order, if any.
    pub fn missing_field(&self) -> Option<Field> {
        Field::ALL.into_iter().find(|&field| self.len_of(field) == 0)
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }

    fn len_of(&self, field: Field) -> usize {
        match field {
            Field::DeviceId => self.device_id.len(),
            Field::Cert => self.cert_pem.len(),
            Field::Key => self.key_pem.len(),
            Field::CaCert => self.ca_pem.len(),
            Field::GroupKey => self.group_key.len(),
        }
    }
}

// Sizes only: key material must never reach a log line.
impl fmt::Debug for IdentityBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityBundle")
            .field("device_id", &self.device_id)
            .field("cert_pem", &format_args!("{}B", self.cert_pem.len()))
            .field("key_pem", &format_args!("{}B", self.key_pem.len()))
            .field("ca_pem", &format_args!("{}B", self.ca_pem.len()))
            .field("group_key", &format_args!("{}B", self.group_key.len()))
            .finish()
    }
}

impl fmt::Display for IdentityBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "device={} cert={}B key={}B ca={}B group_key={}B",
            self.device_id,
            self.cert_pem.len(),
            self.key_pem.len(),
            self.ca_pem.len(),
            self.group_key.len(),
        )
    }
}

// ── Tests ────────────────────────────────────────────────────
