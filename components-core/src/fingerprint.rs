//! Lock-file fingerprints.
//!
//! The `edit` workflow digests a component's `poetry.lock` before and after
//! the editing session to decide whether anything needs rebuilding.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{io_err, ComponentError};
use crate::registry::Registry;
use crate::types::ComponentName;

/// Name of the fingerprinted dependency-lock artifact.
pub const LOCK_FILE: &str = "poetry.lock";

/// SHA-256 digest of an artifact's bytes, or [`Fingerprint::Absent`] when the
/// artifact does not exist. Two `Absent` values compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    Absent,
    Digest(String),
}

impl Fingerprint {
    /// Digest in-memory content.
    pub fn of_bytes(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Fingerprint::Digest(hex::encode(hasher.finalize()))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Fingerprint::Absent)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Absent => write!(f, "<absent>"),
            Fingerprint::Digest(hex) => write!(f, "{hex}"),
        }
    }
}

/// Digest the file at `path`; a missing file is [`Fingerprint::Absent`].
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint, ComponentError> {
    match std::fs::read(path) {
        Ok(content) => Ok(Fingerprint::of_bytes(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(Fingerprint::Absent),
        Err(err) => Err(io_err(path, err)),
    }
}

/// `<root>/<component>/poetry.lock`: pure, no I/O.
pub fn lock_path(registry: &Registry, component: &ComponentName) -> PathBuf {
    registry.component_dir(component).join(LOCK_FILE)
}

/// Fingerprint a component's lock file.
pub fn lock_fingerprint(
    registry: &Registry,
    component: &ComponentName,
) -> Result<Fingerprint, ComponentError> {
    let path = lock_path(registry, component);
    let fingerprint = fingerprint_file(&path)?;
    tracing::debug!(path = %path.display(), %fingerprint, "fingerprinted lock file");
    Ok(fingerprint)
}
