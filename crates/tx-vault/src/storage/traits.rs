//! Storage trait definitions

use crate::error::Result;
use crate::transaction::TxSecureRecord;
use async_trait::async_trait;
use uuid::Uuid;

/// Trait for transaction record backends
///
/// Backends only ever see envelope-encrypted records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record
    async fn insert(&self, record: &TxSecureRecord) -> Result<()>;

    /// Retrieve a record by id
    async fn get(&self, id: Uuid) -> Result<Option<TxSecureRecord>>;

    /// List records, optionally restricted to one party
    async fn list(&self, party_id: Option<&str>) -> Result<Vec<TxSecureRecord>>;

    /// Delete a record, returning whether it existed
    async fn delete(&self, id: Uuid) -> Result<bool>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
