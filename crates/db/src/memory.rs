//! In-memory [`SchemaTarget`] for exercising bootstrap logic without a server.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use docchat_kernel::schema::IndexSpec;
use mongodb::bson::{doc, Document};

use crate::error::DbError;
use crate::target::{key_document, SchemaTarget};

/// Collections mapped to their index key patterns, `_id` first.
pub type Snapshot = BTreeMap<String, Vec<Document>>;

/// Behaves like an empty MongoDB database. Unlike the server, it records a
/// duplicate index if asked to create one twice, so callers can assert they never do.
#[derive(Default)]
pub struct MemoryTarget {
    collections: Mutex<Snapshot>,
    create_index_calls: AtomicUsize,
    unreachable: bool,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// A target whose every call fails as if the server could not be reached.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Pre-create a collection with extra indexes besides `_id`.
    pub fn seed_collection(&self, name: &str, indexes: Vec<Document>) {
        let mut keys = vec![doc! { "_id": 1 }];
        keys.extend(indexes);
        self.lock().insert(name.to_string(), keys);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.lock().clone()
    }

    pub fn index_keys_of(&self, collection: &str) -> Vec<Document> {
        self.lock().get(collection).cloned().unwrap_or_default()
    }

    pub fn create_index_calls(&self) -> usize {
        self.create_index_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Snapshot> {
        // A panic while holding the lock only happens in a failing test.
        self.collections
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn reachable(&self) -> Result<(), DbError> {
        if self.unreachable {
            return Err(DbError::connection(
                "memory",
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SchemaTarget for MemoryTarget {
    async fn collection_names(&self) -> Result<Vec<String>, DbError> {
        self.reachable()?;
        Ok(self.lock().keys().cloned().collect())
    }

    async fn create_collection(&self, name: &str) -> Result<(), DbError> {
        self.reachable()?;
        self.lock()
            .entry(name.to_string())
            .or_insert_with(|| vec![doc! { "_id": 1 }]);
        Ok(())
    }

    async fn index_keys(&self, collection: &str) -> Result<Vec<Document>, DbError> {
        self.reachable()?;
        self.lock().get(collection).cloned().ok_or_else(|| {
            DbError::operation(
                "list indexes",
                collection,
                std::io::Error::new(std::io::ErrorKind::NotFound, "ns does not exist"),
            )
        })
    }

    async fn create_index(&self, collection: &str, index: &IndexSpec) -> Result<(), DbError> {
        self.reachable()?;
        self.create_index_calls.fetch_add(1, Ordering::SeqCst);
        // Like the server, creating an index implicitly creates its collection.
        self.lock()
            .entry(collection.to_string())
            .or_insert_with(|| vec![doc! { "_id": 1 }])
            .push(key_document(index));
        Ok(())
    }
}
