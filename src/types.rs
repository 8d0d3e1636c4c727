//! Core types for manifest builds.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One group of source files concatenated into a single destination file.
///
/// Source paths arrive fully resolved; pattern expansion is the host build
/// tool's job.
#[derive(Debug, Clone, Deserialize)]
pub struct FileGroup {
    /// Source files, concatenated in order.
    pub src: Vec<PathBuf>,
    /// Destination file receiving the concatenated content.
    pub dest: PathBuf,
}

/// Concatenated destination content, prior to hashing.
///
/// Owned exclusively by the hashing job that consumes it and discarded
/// after the digest is computed.
#[derive(Debug, Clone)]
pub struct DestinationPayload {
    /// Working-directory context the destination was concatenated under.
    pub base_path: PathBuf,
    /// Path the concatenated content was written to.
    pub destination_path: PathBuf,
    /// The concatenated content itself.
    pub content: String,
}

/// A single manifest entry: relative path and its sliced digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashEntry {
    pub relative_path: String,
    pub hash: String,
}

/// Relative path -> sliced hash, ordered for deterministic serialization.
pub type HashStore = BTreeMap<String, String>;

/// Manifest file name -> hash store.
///
/// One store is used per run (the configured manifest file name), but the
/// table supports multiple logical stores.
#[derive(Debug, Clone, Default)]
pub struct ManifestTable {
    stores: BTreeMap<String, HashStore>,
}

impl ManifestTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one entry into the named store.
    ///
    /// Last writer wins when two destinations normalize to the same
    /// relative path.
    pub fn insert(&mut self, file_name: &str, entry: HashEntry) {
        self.stores
            .entry(file_name.to_string())
            .or_default()
            .insert(entry.relative_path, entry.hash);
    }

    /// Snapshot of the named store, isolated from further mutation.
    pub fn snapshot(&self, file_name: &str) -> HashStore {
        self.stores.get(file_name).cloned().unwrap_or_default()
    }
}
