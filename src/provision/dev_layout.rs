//! Developer filesystem layout.
//!
//! Five plaintext files in one directory, stored in final form: no base64,
//! no hex. Only `device_id.txt` is touched, and only to trim whitespace.
//! This path exists for local development and tests; it makes no promise
//! about how the files are protected.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::config::DEV_CERT_DIR;
use crate::error::{DecodeFailure, ProvisionError, Result};
use crate::identity::{Field, IdentityBundle};

/// Resolves the identity from `<root>/{cert.pem,key.pem,ca.crt,group_key.enc,device_id.txt}`.
#[derive(Debug, Clone)]
pub struct DevLayoutSource {
    root: PathBuf,
}

impl Default for DevLayoutSource {
    fn default() -> Self {
        Self::new(DEV_CERT_DIR)
    }
}

impl DevLayoutSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, field: Field) -> PathBuf {
        self.root.join(field.dev_file())
    }

    pub fn resolve(&self) -> Result<IdentityBundle> {
        let cert_pem = self.read(Field::Cert)?;
        let key_pem = self.read(Field::Key)?;
        let ca_pem = self.read(Field::CaCert)?;
        let group_key = self.read(Field::GroupKey)?;
        let id_bytes = self.read(Field::DeviceId)?;

        let device_id = String::from_utf8(id_bytes)
            .map_err(|e| ProvisionError::Encoding {
                field: Field::DeviceId,
                source: DecodeFailure::Utf8(e),
            })?
            .trim()
            .to_owned();

        let bundle =
            IdentityBundle::assemble("dev mode", device_id, cert_pem, key_pem, ca_pem, group_key)?;
        info!(
            "Provisioner: loaded identity in DEV mode from {} ({})",
            self.root.display(),
            bundle
        );
        Ok(bundle)
    }

    fn read(&self, field: Field) -> Result<Vec<u8>> {
        let path = self.path_of(field);
        fs::read(&path).map_err(|source| ProvisionError::FileRead { path, source })
    }
}
