//! Unified error types for identity provisioning.
//!
//! Every resolution path funnels into [`ProvisionError`]. Each variant names
//! the entry, file, field or stage that failed so a startup failure can be
//! diagnosed from the log line alone. All provisioning errors are terminal:
//! nothing here is retried, the bootstrap decides whether to abort.

use core::fmt;
use std::io;
use std::path::PathBuf;

use crate::app::ports::SecretStoreError;
use crate::identity::Field;

// ---------------------------------------------------------------------------
// Top-level provisioning error
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ProvisionError {
    /// A keychain entry was absent or could not be read.
    SecretStoreRead {
        key: &'static str,
        source: SecretStoreError,
    },
    /// A stored value was not valid base64 / hex / UTF-8.
    Encoding { field: Field, source: DecodeFailure },
    /// The running executable could not be located or read.
    ExecutableAccess {
        stage: ExecutableStage,
        source: io::Error,
    },
    /// The append marker is absent from the scanned tail window.
    MarkerNotFound { scanned: usize },
    /// Bytes after the marker are not a valid embedded record.
    MalformedEmbeddedData(serde_json::Error),
    /// A developer-layout file could not be read.
    FileRead { path: PathBuf, source: io::Error },
    /// The device id resolved to an empty string.
    EmptyDeviceId { origin: &'static str },
    /// A key-material field resolved to zero bytes.
    IncompleteBundle { field: Field },
}

impl fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecretStoreRead { key, source } => {
                write!(f, "keychain: could not read {key:?}: {source}")
            }
            Self::Encoding { field, source } => {
                write!(f, "could not decode {}: {source}", field.label())
            }
            Self::ExecutableAccess { stage, source } => {
                write!(f, "executable image: {stage} failed: {source}")
            }
            Self::MarkerNotFound { scanned } => write!(
                f,
                "embedded marker not found in the last {scanned} bytes of the executable"
            ),
            Self::MalformedEmbeddedData(e) => write!(f, "cannot parse embedded record: {e}"),
            Self::FileRead { path, source } => {
                write!(f, "dev mode: failed to read {}: {source}", path.display())
            }
            Self::EmptyDeviceId { origin } => write!(f, "{origin}: device ID is empty"),
            Self::IncompleteBundle { field } => {
                write!(f, "identity incomplete: {} is empty", field.label())
            }
        }
    }
}

impl std::error::Error for ProvisionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SecretStoreRead { source, .. } => Some(source),
            Self::Encoding { source, .. } => Some(source),
            Self::ExecutableAccess { source, .. } | Self::FileRead { source, .. } => Some(source),
            Self::MalformedEmbeddedData(e) => Some(e),
            Self::MarkerNotFound { .. }
            | Self::EmptyDeviceId { .. }
            | Self::IncompleteBundle { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Decode failures
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum DecodeFailure {
    Base64(base64::DecodeError),
    Hex(hex::FromHexError),
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base64(e) => write!(f, "invalid base64: {e}"),
            Self::Hex(e) => write!(f, "invalid hex: {e}"),
            Self::Utf8(e) => write!(f, "invalid UTF-8: {e}"),
        }
    }
}

impl std::error::Error for DecodeFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Base64(e) => Some(e),
            Self::Hex(e) => Some(e),
            Self::Utf8(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Executable access stages
// ---------------------------------------------------------------------------

/// Which step of reading the executable's own image failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutableStage {
    Locate,
    Resolve,
    Open,
    Stat,
    Seek,
    Read,
}

impl fmt::Display for ExecutableStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Locate => write!(f, "locating executable path"),
            Self::Resolve => write!(f, "resolving symlinks"),
            Self::Open => write!(f, "opening executable"),
            Self::Stat => write!(f, "reading executable size"),
            Self::Seek => write!(f, "seeking to tail window"),
            Self::Read => write!(f, "reading tail window"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Provisioning `Result` alias.
pub type Result<T> = core::result::Result<T, ProvisionError>;
