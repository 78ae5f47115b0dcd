//! Identity embedded in the executable's own image.
//!
//! Per-device downloads are produced by appending a marker and a JSON
//! record to the built binary:
//!
//! ```text
//! ┌──────────────────────────┬──────────────────────────┬─────────────────┐
//! │ executable image         │ "\n--APPEND_MARKER--\n"  │ {"device_id":…} │
//! └──────────────────────────┴──────────────────────────┴─────────────────┘
//!                            ◀──────── last 64 KiB scanned ───────────────▶
//! ```
//!
//! Only the trailing [`MAX_TAIL_SIZE`] bytes are read. The last marker in
//! that window wins; everything after it is the record.

use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::{MARKER, MAX_TAIL_SIZE};
use crate::error::{DecodeFailure, ExecutableStage, ProvisionError, Result};
use crate::identity::{Field, IdentityBundle};

/// JSON payload following the marker. PEM text is stored as-is; only the
/// group key is hex encoded.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct EmbeddedRecord {
    pub device_id: String,
    pub cert: String,
    pub key: String,
    pub ca_cert: String,
    /// Hex text.
    pub group_key: String,
}

impl EmbeddedRecord {
    /// Marker followed by the serialized record, ready to append to a binary.
    pub fn trailer(&self) -> core::result::Result<Vec<u8>, serde_json::Error> {
        let mut out = MARKER.to_vec();
        serde_json::to_writer(&mut out, self)?;
        Ok(out)
    }

    fn into_bundle(mut self) -> Result<IdentityBundle> {
        let group_key = hex::decode(self.group_key.as_bytes()).map_err(|e| {
            ProvisionError::Encoding {
                field: Field::GroupKey,
                source: DecodeFailure::Hex(e),
            }
        })?;
        IdentityBundle::assemble(
            "embedded record",
            core::mem::take(&mut self.device_id),
            core::mem::take(&mut self.cert).into_bytes(),
            core::mem::take(&mut self.key).into_bytes(),
            core::mem::take(&mut self.ca_cert).into_bytes(),
            group_key,
        )
    }
}

/// Resolves the identity from the record appended to an executable image.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedImageSource {
    path: Option<PathBuf>,
}

impl EmbeddedImageSource {
    /// Read the currently running executable.
    pub fn current_executable() -> Self {
        Self { path: None }
    }

    /// Read an explicit image instead of the running executable.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn resolve(&self) -> Result<IdentityBundle> {
        let path = self.image_path()?;
        debug!("Provisioner: scanning tail of {}", path.display());
        let tail = read_tail(&path, MAX_TAIL_SIZE)?;
        let bundle = parse_image_tail(&tail)?;
        info!(
            "Provisioner: loaded identity embedded in {} ({})",
            path.display(),
            bundle
        );
        Ok(bundle)
    }

    /// Real path of the image, with symlinks resolved.
    fn image_path(&self) -> Result<PathBuf> {
        let raw = match &self.path {
            Some(p) => p.clone(),
            None => std::env::current_exe().map_err(|source| ProvisionError::ExecutableAccess {
                stage: ExecutableStage::Locate,
                source,
            })?,
        };
        fs::canonicalize(&raw).map_err(|source| ProvisionError::ExecutableAccess {
            stage: ExecutableStage::Resolve,
            source,
        })
    }
}

/// Read at most `window` trailing bytes of the file at `path`.
pub fn read_tail(path: &Path, window: usize) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(access(ExecutableStage::Open))?;
    let size = file
        .metadata()
        .map_err(access(ExecutableStage::Stat))?
        .len();
    let start = size.saturating_sub(window as u64);
    file.seek(SeekFrom::Start(start))
        .map_err(access(ExecutableStage::Seek))?;

    let mut buf = Vec::with_capacity((size - start) as usize);
    file.take(window as u64)
        .read_to_end(&mut buf)
        .map_err(access(ExecutableStage::Read))?;
    Ok(buf)
}

fn access(stage: ExecutableStage) -> impl FnOnce(io::Error) -> ProvisionError {
    move |source| ProvisionError::ExecutableAccess { stage, source }
}

/// Parse a whole image held in memory, honouring the tail window.
pub fn parse_image(image: &[u8]) -> Result<IdentityBundle> {
    let start = image.len().saturating_sub(MAX_TAIL_SIZE);
    parse_image_tail(&image[start..])
}

/// Parse an already-windowed tail: locate the last marker and decode the
/// record after it.
pub fn parse_image_tail(tail: &[u8]) -> Result<IdentityBundle> {
    let idx = find_marker(tail).ok_or(ProvisionError::MarkerNotFound {
        scanned: tail.len(),
    })?;
    let record: EmbeddedRecord = serde_json::from_slice(&tail[idx + MARKER.len()..])
        .map_err(ProvisionError::MalformedEmbeddedData)?;
    record.into_bundle()
}

/// Offset of the last occurrence of [`MARKER`] in `haystack`.
pub fn find_marker(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(MARKER.len())
        .rposition(|w| w == MARKER)
}

// ── Tests ────────────────────────────────────────────────────
