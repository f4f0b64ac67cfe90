//! In-memory storage backend

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::RecordStore;
use crate::error::{Result, VaultError};
use crate::transaction::TxSecureRecord;

/// Volatile record store, useful for tests and ephemeral services
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, TxSecureRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, record: &TxSecureRecord) -> Result<()> {
        let mut records = self.records.write().await;

        if records.contains_key(&record.id) {
            return Err(VaultError::StorageError(format!(
                "Duplicate record id: {}",
                record.id
            )));
        }

        records.insert(record.id, record.clone());
        debug!("Stored record: {}", record.id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<TxSecureRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list(&self, party_id: Option<&str>) -> Result<Vec<TxSecureRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| party_id.map_or(true, |p| r.party_id == p))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let removed = self.records.write().await.remove(&id).is_some();
        if removed {
            debug!("Deleted record: {}", id);
        }
        Ok(removed)
    }

    fn backend_name(&self) -> &'static str {
        "In-Memory Storage"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_for(party: &str) -> TxSecureRecord {
        let envelope = envelope_core::encrypt(&json!({ "party": party }), &"d".repeat(64)).unwrap();
        TxSecureRecord::new(party, envelope)
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryStore::new();
        let record = record_for("alice");

        store.insert(&record).await.unwrap();

        assert_eq!(store.get(record.id).await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = MemoryStore::new();
        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = MemoryStore::new();
        let record = record_for("alice");

        store.insert(&record).await.unwrap();
        assert!(matches!(
            store.insert(&record).await,
            Err(VaultError::StorageError(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_party() {
        let store = MemoryStore::new();
        store.insert(&record_for("alice")).await.unwrap();
        store.insert(&record_for("alice")).await.unwrap();
        store.insert(&record_for("bob")).await.unwrap();

        assert_eq!(store.list(None).await.unwrap().len(), 3);
        assert_eq!(store.list(Some("alice")).await.unwrap().len(), 2);
        assert!(store.list(Some("carol")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let record = record_for("alice");
        store.insert(&record).await.unwrap();

        assert!(store.delete(record.id).await.unwrap());
        assert!(!store.delete(record.id).await.unwrap());
        assert_eq!(store.get(record.id).await.unwrap(), None);
    }
}
