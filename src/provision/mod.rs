//! Credential provisioning: resolve the device identity at startup.
//!
//! ```text
//!                 ┌────────────────────┐
//!   keychain  ───▶│ SecretStoreSource  │──┐
//!                 └────────────────────┘  │
//!                 ┌────────────────────┐  │   ┌────────────────┐
//!   own image ───▶│ EmbeddedImageSource│──┼──▶│ IdentityBundle │
//!                 └────────────────────┘  │   └────────────────┘
//!                 ┌────────────────────┐  │
//!   ./config  ───▶│ DevLayoutSource    │──┘
//!                 └────────────────────┘
//! ```
//!
//! Exactly one source is consulted per run, chosen by
//! [`DeploymentMode`]. Every source is local, blocking and retry-free: a
//! failure is deterministic for a given install, so it is returned to the
//! bootstrap as-is.

pub mod dev_layout;
pub mod embedded;
pub mod secret_store;

pub use dev_layout::DevLayoutSource;
pub use embedded::{EmbeddedImageSource, EmbeddedRecord};
pub use secret_store::SecretStoreSource;

use crate::app::ports::SecretStore;
use crate::config::{DeploymentMode, ProvisionConfig};
use crate::error::Result;
use crate::identity::IdentityBundle;

/// The closed set of identity sources behind one `resolve` capability.
pub enum Provisioner<S> {
    SecretStore(SecretStoreSource<S>),
    EmbeddedImage(EmbeddedImageSource),
    DevLayout(DevLayoutSource),
}

impl<S: SecretStore> Provisioner<S> {
    /// Pick the source for `config.mode`. `store` is only used in
    /// keychain mode.
    pub fn from_config(config: &ProvisionConfig, store: S) -> Self {
        match config.mode {
            DeploymentMode::Keychain => Self::SecretStore(SecretStoreSource::with_service(
                store,
                config.keychain_service.clone(),
            )),
            DeploymentMode::Embedded => {
                Self::EmbeddedImage(EmbeddedImageSource::current_executable())
            }
            DeploymentMode::Dev => Self::DevLayout(DevLayoutSource::new(config.dev_dir.clone())),
        }
    }

    pub fn mode(&self) -> DeploymentMode {
        match self {
            Self::SecretStore(_) => DeploymentMode::Keychain,
            Self::EmbeddedImage(_) => DeploymentMode::Embedded,
            Self::DevLayout(_) => DeploymentMode::Dev,
        }
    }

    /// Resolve the full identity, or fail without producing anything.
    pub fn resolve(&self) -> Result<IdentityBundle> {
        match self {
            Self::SecretStore(src) => src.resolve(),
            Self::EmbeddedImage(src) => src.resolve(),
            Self::DevLayout(src) => src.resolve(),
        }
    }
}
