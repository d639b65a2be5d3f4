//! Document store collaborator.
//!
//! The core never does I/O itself. A host application supplies a
//! [`DocumentStore`] that can fetch and save the raw LIFT XML of one entry;
//! [`EntryStore`] layers the codec on top of it.

use indexmap::IndexMap;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::lift::{LiftCodec, ParseError, SerializeError};
use crate::model::Entry;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entry `{0}` not found")]
    NotFound(String),

    /// Failure reported by the backing store.
    #[error("store backend: {0}")]
    Backend(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),

    #[error("entry has no id")]
    MissingId,
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

/// Raw XML access to stored entries.
///
/// Transactions, locking and querying are the implementation's business.
pub trait DocumentStore: Send + Sync {
    fn load_raw_xml(&self, entry_id: &str) -> Result<String, StoreError>;

    fn save_raw_xml(&self, entry_id: &str, xml: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<IndexMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.docs.read().keys().cloned().collect()
    }
}

impl DocumentStore for MemoryStore {
    fn load_raw_xml(&self, entry_id: &str) -> Result<String, StoreError> {
        self.docs
            .read()
            .get(entry_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(entry_id.to_string()))
    }

    fn save_raw_xml(&self, entry_id: &str, xml: &str) -> Result<(), StoreError> {
        self.docs.write().insert(entry_id.to_string(), xml.to_string());
        Ok(())
    }
}

/// Typed entry access over a [`DocumentStore`].
#[derive(Debug)]
pub struct EntryStore<S> {
    store: S,
    codec: LiftCodec,
}

impl<S: DocumentStore> EntryStore<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            codec: LiftCodec::default(),
        }
    }

    pub fn with_codec(mut self, codec: LiftCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn load_entry(&self, entry_id: &str) -> Result<Entry, StoreError> {
        let xml = self.store.load_raw_xml(entry_id)?;
        Ok(self.codec.parse(xml.as_bytes())?)
    }

    /// Serialize and save under the entry's own id. Entries without an id
    /// are rejected; call [`Entry::ensure_id`] first for new entries.
    pub fn save_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        let id = entry.id.trim();
        if id.is_empty() {
            return Err(StoreError::MissingId);
        }
        let xml = self.codec.serialize(entry)?;
        debug!(entry = id, bytes = xml.len(), "saving entry");
        self.store.save_raw_xml(id, &xml)
    }
}
