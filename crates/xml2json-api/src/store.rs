//! Write-through storage for converted documents

use indexmap::IndexMap;
use parking_lot::RwLock;
use thiserror::Error;
use uuid::Uuid;
use xml2json::Value;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store has no room for documents")]
    ZeroCapacity,
}

/// Key-value store for converted documents
pub trait Store: Send + Sync {
    /// Store a document under a freshly generated id
    fn put(&self, value: Value) -> Result<Uuid, StoreError>;

    fn get(&self, id: &Uuid) -> Result<Option<Value>, StoreError>;
}

/// Process-local store, contents are lost on restart
///
/// Holds at most `capacity` documents; storing one more evicts the oldest.
#[derive(Debug)]
pub struct MemoryStore {
    documents: RwLock<IndexMap<Uuid, Value>>,
    capacity: usize,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            documents: RwLock::new(IndexMap::new()),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl Store for MemoryStore {
    fn put(&self, value: Value) -> Result<Uuid, StoreError> {
        if self.capacity == 0 {
            return Err(StoreError::ZeroCapacity);
        }
        let mut documents = self.documents.write();
        if documents.len() >= self.capacity {
            if let Some((evicted, _)) = documents.shift_remove_index(0) {
                tracing::debug!(%evicted, "evicted oldest document");
            }
        }
        let id = Uuid::new_v4();
        documents.insert(id, value);
        Ok(id)
    }

    fn get(&self, id: &Uuid) -> Result<Option<Value>, StoreError> {
        Ok(self.documents.read().get(id).cloned())
    }
}
