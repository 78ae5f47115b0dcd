//! Keychain-backed identity resolution.
//!
//! Five entries live under one service namespace, each stored as base64
//! text. The device id is base64 too; it is decoded and then read as UTF-8.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use log::{debug, info};

use crate::app::ports::SecretStore;
use crate::config::KEYCHAIN_SERVICE;
use crate::error::{DecodeFailure, ProvisionError, Result};
use crate::identity::{Field, IdentityBundle};

/// Resolves the identity from a [`SecretStore`].
pub struct SecretStoreSource<S> {
    store: S,
    service: String,
}

impl<S: SecretStore> SecretStoreSource<S> {
    /// Source reading the default `HoppyShare` service.
    pub fn new(store: S) -> Self {
        Self::with_service(store, KEYCHAIN_SERVICE)
    }

    pub fn with_service(store: S, service: impl Into<String>) -> Self {
        Self {
            store,
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Read and decode all five entries. Nothing is returned unless every
    /// entry decoded.
    pub fn resolve(&self) -> Result<IdentityBundle> {
        let id_bytes = self.read_entry(Field::DeviceId)?;
        let ca_pem = self.read_entry(Field::CaCert)?;
        let cert_pem = self.read_entry(Field::Cert)?;
        let key_pem = self.read_entry(Field::Key)?;
        let group_key = self.read_entry(Field::GroupKey)?;

        let device_id = String::from_utf8(id_bytes).map_err(|e| ProvisionError::Encoding {
            field: Field::DeviceId,
            source: DecodeFailure::Utf8(e),
        })?;

        let bundle =
            IdentityBundle::assemble("keychain", device_id, cert_pem, key_pem, ca_pem, group_key)?;
        info!(
            "Provisioner: loaded identity from keychain service '{}' ({})",
            self.service, bundle
        );
        Ok(bundle)
    }

    fn read_entry(&self, field: Field) -> Result<Vec<u8>> {
        let key = field.keychain_key();
        let encoded = self
            .store
            .get(&self.service, key)
            .map_err(|source| ProvisionError::SecretStoreRead { key, source })?;
        debug!("Provisioner: keychain entry '{}' ({}B encoded)", key, encoded.len());
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| ProvisionError::Encoding {
                field,
                source: DecodeFailure::Base64(e),
            })
    }
}
