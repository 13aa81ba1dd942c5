//! Plain-text list of record files already mapped, one path per line.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::BatchError;

/// Paths already processed by earlier runs plus the ones mapped in this
/// run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedManifest {
    entries: BTreeSet<PathBuf>,
}

impl ProcessedManifest {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a manifest. A missing file is an empty manifest.
    pub fn read(path: &Path) -> Result<Self, BatchError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::new()),
            Err(source) => {
                return Err(BatchError::Manifest {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect();
        Ok(Self { entries })
    }

    /// Write every entry, one per line, in sorted order.
    pub fn save(&self, path: &Path) -> Result<(), BatchError> {
        let mut text = String::new();
        for entry in &self.entries {
            text.push_str(&entry.to_string_lossy());
            text.push('\n');
        }
        std::fs::write(path, text).map_err(|source| BatchError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains(path)
    }

    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.entries.insert(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
