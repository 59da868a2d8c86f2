//! Topic Registry
//!
//! Maps topic names to owned log stores.
//!
//! ## Responsibilities
//! - Create a topic's directory and store lazily on first reference
//! - Guarantee at most one open store per topic per process
//! - Validate caller-supplied topic names before touching the filesystem
//! - Close every open store on shutdown
//!
//! ## Concurrency
//! The registry lock guards only the topic → store mapping. It is
//! independent of the per-store locks and is never held across a store's
//! append/read, so traffic on one topic does not serialize the others.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::SyncPolicy;
use crate::error::{FerroError, Result};

use super::Store;

/// Backing file name within each topic directory
pub const STORE_FILENAME: &str = "store.bin";

/// Owns the collection of per-topic log stores under one directory root.
///
/// Layout: `{base_dir}/{topic}/store.bin`, one file per topic.
pub struct Registry {
    /// Root directory for all topic data
    base_dir: PathBuf,

    /// Durability policy handed to every store this registry opens
    sync_policy: SyncPolicy,

    /// Open stores, keyed by topic name
    stores: Mutex<HashMap<String, Arc<Store>>>,
}

impl Registry {
    /// Open a registry rooted at `base_dir`, creating the directory if needed
    pub fn open(base_dir: impl Into<PathBuf>, sync_policy: SyncPolicy) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;

        tracing::debug!(base_dir = %base_dir.display(), "opened registry");

        Ok(Self {
            base_dir,
            sync_policy,
            stores: Mutex::new(HashMap::new()),
        })
    }

    /// Return the store for `topic`, opening it on first reference.
    ///
    /// Runs under the registry lock, so concurrent first access to the same
    /// topic still produces exactly one store instance (and one open file
    /// handle) per topic.
    pub fn get_or_create(&self, topic: &str) -> Result<Arc<Store>> {
        validate_topic(topic)?;

        let mut stores = self.stores.lock();

        // Step 1: Already open?
        if let Some(store) = stores.get(topic) {
            return Ok(Arc::clone(store));
        }

        // Step 2: First reference: create the topic directory
        let topic_dir = self.base_dir.join(topic);
        fs::create_dir_all(&topic_dir)?;

        // Step 3: Open the backing file and run recovery
        let store = Arc::new(Store::open(topic_dir.join(STORE_FILENAME), self.sync_policy)?);

        tracing::info!(topic, records = store.size(), "opened topic");

        // Step 4: Register under the topic name
        stores.insert(topic.to_string(), Arc::clone(&store));
        Ok(store)
    }

    /// Close every open store.
    ///
    /// Best-effort: every store is attempted regardless of earlier
    /// failures; the first error (if any) is returned after the sweep.
    pub fn close_all(&self) -> Result<()> {
        let mut stores = self.stores.lock();
        let mut first_err = None;

        for (topic, store) in stores.drain() {
            if let Err(e) = store.close() {
                tracing::warn!(topic, error = %e, "failed to close store");
                first_err.get_or_insert(e);
            }
        }

        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Names of all currently open topics
    pub fn topics(&self) -> Vec<String> {
        self.stores.lock().keys().cloned().collect()
    }

    /// Root directory for all topic data
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Reject topic names that are empty or unusable as a single path segment.
///
/// Names reach the filesystem as `{base_dir}/{topic}`, so separators and
/// dot-relative names would escape the data directory.
fn validate_topic(topic: &str) -> Result<()> {
    if topic.is_empty() {
        return Err(FerroError::InvalidTopic("empty name".to_string()));
    }
    if topic == "." || topic == ".." {
        return Err(FerroError::InvalidTopic(format!(
            "'{topic}' is not a valid topic name"
        )));
    }
    if topic.contains(['/', '\\', '\0']) {
        return Err(FerroError::InvalidTopic(format!(
            "'{topic}' contains a path separator"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_topic;

    #[test]
    fn test_validate_topic_accepts_plain_names() {
        assert!(validate_topic("orders").is_ok());
        assert!(validate_topic("orders-v2.archive").is_ok());
        assert!(validate_topic("UPPER_case_123").is_ok());
    }

    #[test]
    fn test_validate_topic_rejects_traversal() {
        assert!(validate_topic("").is_err());
        assert!(validate_topic(".").is_err());
        assert!(validate_topic("..").is_err());
        assert!(validate_topic("a/b").is_err());
        assert!(validate_topic("a\\b").is_err());
        assert!(validate_topic("nul\0byte").is_err());
    }
}
