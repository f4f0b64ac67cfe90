//! Transaction service: request validation, envelope encryption, persistence

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};
use crate::storage::RecordStore;
use crate::transaction::{DecryptedTransaction, EncryptRequest, RecordSummary, TxSecureRecord};

/// Encrypts, stores and decrypts party transactions
///
/// Holds the master key only in its hex form; the envelope core decodes it
/// per call.
pub struct TransactionService {
    store: Arc<dyn RecordStore>,
    master_key: Zeroizing<String>,
}

impl TransactionService {
    /// Create a new transaction service
    pub fn new(store: Arc<dyn RecordStore>, master_key_hex: Zeroizing<String>) -> Self {
        debug!("Transaction service using {}", store.backend_name());
        Self {
            store,
            master_key: master_key_hex,
        }
    }

    /// Validate, encrypt and persist a transaction payload
    pub async fn encrypt(&self, request: &EncryptRequest) -> Result<RecordSummary> {
        request.validate()?;

        let envelope = envelope_core::encrypt(&request.payload, &self.master_key)?;
        let record = TxSecureRecord::new(request.party_id.clone(), envelope);

        self.store.insert(&record).await?;

        info!(id = %record.id, party_id = %record.party_id, "Stored encrypted transaction");
        Ok(record.summary())
    }

    /// Fetch the stored (still encrypted) record
    pub async fn get(&self, id: Uuid) -> Result<TxSecureRecord> {
        self.store.get(id).await?.ok_or(VaultError::NotFound(id))
    }

    /// Fetch and decrypt a stored transaction
    pub async fn decrypt(&self, id: Uuid) -> Result<DecryptedTransaction> {
        let record = self.get(id).await?;

        let payload = envelope_core::decrypt(&record.envelope, &self.master_key)
            .inspect_err(|e| warn!(id = %id, error = %e, "Failed to decrypt transaction"))?;

        debug!(id = %id, "Decrypted transaction");
        Ok(DecryptedTransaction {
            id: record.id,
            party_id: record.party_id,
            created_at: record.created_at,
            payload,
        })
    }

    /// List record summaries, newest first
    pub async fn list(&self, party_id: Option<&str>) -> Result<Vec<RecordSummary>> {
        let mut summaries: Vec<RecordSummary> = self
            .store
            .list(party_id)
            .await?
            .iter()
            .map(TxSecureRecord::summary)
            .collect();

        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    /// Remove a stored transaction
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(VaultError::NotFound(id));
        }
        info!(id = %id, "Deleted transaction");
        Ok(())
    }
}
