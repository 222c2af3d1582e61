// SPDX-License-Identifier: PMPL-1.0-or-later

//! Process-wide catalog handle with whole-catalog replacement.
//!
//! Readers take a [`snapshot`](SharedCatalog::snapshot) (an `Arc` clone) and
//! run lookups against it without holding any lock. A reload builds the new
//! catalog completely before swapping the pointer, so a reader observes
//! either the old catalog or the new one, never a mixture.

use crate::catalog::{LoadOptions, ParseError, TranslationCatalog};
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

#[derive(Debug)]
pub struct SharedCatalog {
    current: RwLock<Arc<TranslationCatalog>>,
}

impl SharedCatalog {
    pub fn new(catalog: TranslationCatalog) -> Self {
        Self {
            current: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The catalog as of now. Later swaps do not affect the returned value.
    pub fn snapshot(&self) -> Arc<TranslationCatalog> {
        // The guarded value is a plain Arc, so a poisoned lock still holds a
        // complete catalog.
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publish `catalog`, returning the one it replaced.
    pub fn replace(&self, catalog: TranslationCatalog) -> Arc<TranslationCatalog> {
        let next = Arc::new(catalog);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Owned lookup through a fresh snapshot.
    pub fn lookup(&self, context: &str, source: &str, disambiguation: Option<&str>) -> String {
        self.snapshot()
            .lookup(context, source, disambiguation)
            .to_string()
    }
}

impl Default for SharedCatalog {
    fn default() -> Self {
        Self::new(TranslationCatalog::empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: FileTime,
    len: u64,
    digest: [u8; 32],
}

/// A catalog file that can be reloaded into a [`SharedCatalog`] when it
/// changes on disk.
#[derive(Debug)]
pub struct CatalogSource {
    path: PathBuf,
    options: LoadOptions,
    last: Mutex<Option<Fingerprint>>,
}

impl CatalogSource {
    pub fn new(path: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: path.into(),
            options,
            last: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file unconditionally and remember its fingerprint.
    pub fn load(&self) -> Result<TranslationCatalog, ReloadError> {
        let bytes = self.read()?;
        let fingerprint = self.fingerprint(&bytes)?;
        let catalog = self.parse(&bytes)?;
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(fingerprint);
        Ok(catalog)
    }

    /// Swap a freshly parsed catalog into `shared` if the file changed since
    /// the last successful load. Returns whether a swap happened.
    ///
    /// A file that fails to parse leaves `shared` untouched.
    pub fn reload_if_changed(&self, shared: &SharedCatalog) -> Result<bool, ReloadError> {
        let metadata = fs::metadata(&self.path).map_err(|source| self.io_error(source))?;
        let modified = FileTime::from_last_modification_time(&metadata);

        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = *last {
            if previous.modified == modified && previous.len == metadata.len() {
                debug!(path = %self.path.display(), "catalog unchanged (mtime)");
                return Ok(false);
            }
        }

        let bytes = self.read()?;
        let fingerprint = Fingerprint {
            modified,
            len: bytes.len() as u64,
            digest: *blake3::hash(&bytes).as_bytes(),
        };
        if let Some(previous) = *last {
            if previous.digest == fingerprint.digest {
                debug!(path = %self.path.display(), "catalog unchanged (content)");
                *last = Some(fingerprint);
                return Ok(false);
            }
        }

        let catalog = self.parse(&bytes)?;
        let entries = catalog.len();
        shared.replace(catalog);
        *last = Some(fingerprint);
        info!(path = %self.path.display(), entries, "catalog reloaded");
        Ok(true)
    }

    fn read(&self) -> Result<Vec<u8>, ReloadError> {
        fs::read(&self.path).map_err(|source| self.io_error(source))
    }

    fn parse(&self, bytes: &[u8]) -> Result<TranslationCatalog, ReloadError> {
        TranslationCatalog::from_bytes_with(bytes, &self.options).map_err(|source| {
            ReloadError::Parse {
                path: self.path.clone(),
                source,
            }
        })
    }

    fn fingerprint(&self, bytes: &[u8]) -> Result<Fingerprint, ReloadError> {
        let metadata = fs::metadata(&self.path).map_err(|source| self.io_error(source))?;
        Ok(Fingerprint {
            modified: FileTime::from_last_modification_time(&metadata),
            len: bytes.len() as u64,
            digest: *blake3::hash(bytes).as_bytes(),
        })
    }

    fn io_error(&self, source: std::io::Error) -> ReloadError {
        ReloadError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CatalogEntry, CatalogHeader};

    fn catalog_with(translation: &str) -> TranslationCatalog {
        TranslationCatalog::from_entries(
            CatalogHeader::default(),
            vec![CatalogEntry::new("QMessageBox", "Yes", translation)],
            &LoadOptions::default(),
        )
    }

    #[test]
    fn snapshot_is_isolated_from_later_swaps() {
        let shared = SharedCatalog::new(catalog_with("Tak"));
        let before = shared.snapshot();
        let old = shared.replace(catalog_with("Jasne"));
        assert_eq!(old.lookup("QMessageBox", "Yes", None), "Tak");
        assert_eq!(before.lookup("QMessageBox", "Yes", None), "Tak");
        assert_eq!(shared.lookup("QMessageBox", "Yes", None), "Jasne");
    }

    #[test]
    fn default_is_empty() {
        let shared = SharedCatalog::default();
        assert_eq!(shared.lookup("A", "b", None), "b");
    }
}
