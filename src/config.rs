//! Provisioning configuration.
//!
//! Selects which credential source is consulted at startup and where the
//! sources live. Defaults match a production install; environment
//! variables override them (see [`ProvisionConfig::from_env`]).

use core::fmt;
use core::str::FromStr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Literal separator between the executable image and the embedded record.
pub const MARKER: &[u8] = b"\n--APPEND_MARKER--\n";

/// Only this many trailing bytes of the executable are scanned for [`MARKER`].
pub const MAX_TAIL_SIZE: usize = 64 * 1024;

/// Secret-store service namespace holding the five identity entries.
pub const KEYCHAIN_SERVICE: &str = "HoppyShare";

/// Developer certificate directory, relative to the working directory.
pub const DEV_CERT_DIR: &str = "./config/certs";

const ENV_MODE: &str = "HOPPYSHARE_MODE";
const ENV_SERVICE: &str = "HOPPYSHARE_KEYCHAIN_SERVICE";
const ENV_DEV_DIR: &str = "HOPPYSHARE_DEV_DIR";
const ENV_BLE_PEER: &str = "HOPPYSHARE_BLE_PEER";
const ENV_LOG: &str = "HOPPYSHARE_LOG";

/// Where the device identity comes from. Exactly one per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Installed build: entries enrolled in the OS secret store.
    #[default]
    Keychain,
    /// Per-device download: record appended to the executable.
    Embedded,
    /// Developer checkout: plaintext files under `dev_dir`.
    Dev,
}

impl DeploymentMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keychain => "keychain",
            Self::Embedded => "embedded",
            Self::Dev => "dev",
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keychain" => Ok(Self::Keychain),
            "embedded" => Ok(Self::Embedded),
            "dev" => Ok(Self::Dev),
            other => Err(ConfigError::UnknownMode(other.to_owned())),
        }
    }
}

/// Startup configuration for the provisioner and the radio bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionConfig {
    pub mode: DeploymentMode,
    pub keychain_service: String,
    pub dev_dir: PathBuf,
    /// Peer device id to open a BLE session with, if any.
    pub ble_peer: Option<String>,
    pub log_level: String,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::default(),
            keychain_service: KEYCHAIN_SERVICE.to_owned(),
            dev_dir: PathBuf::from(DEV_CERT_DIR),
            ble_peer: None,
            log_level: "info".to_owned(),
        }
    }
}

impl ProvisionConfig {
    /// Defaults overlaid with `HOPPYSHARE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(mode) = lookup(ENV_MODE) {
            cfg.mode = mode.parse()?;
        }
        if let Some(service) = lookup(ENV_SERVICE) {
            cfg.keychain_service = service;
        }
        if let Some(dir) = lookup(ENV_DEV_DIR) {
            cfg.dev_dir = PathBuf::from(dir);
        }
        if let Some(peer) = lookup(ENV_BLE_PEER) {
            let peer = peer.trim();
            cfg.ble_peer = (!peer.is_empty()).then(|| peer.to_owned());
        }
        if let Some(level) = lookup(ENV_LOG) {
            cfg.log_level = level;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make every resolution fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keychain_service.trim().is_empty() {
            return Err(ConfigError::EmptyService);
        }
        if self.dev_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDevDir);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownMode(String),
    EmptyService,
    EmptyDevDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMode(m) => write!(
                f,
                "unknown deployment mode {m:?} (expected keychain, embedded or dev)"
            ),
            Self::EmptyService => write!(f, "keychain service name must not be empty"),
            Self::EmptyDevDir => write!(f, "dev certificate directory must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}
