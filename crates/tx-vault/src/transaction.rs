//! Transaction record type definitions

use chrono::{DateTime, Utc};
use envelope_core::{EncryptedRecord, Payload};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, VaultError};

/// Request to encrypt and store a transaction payload for a party
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptRequest {
    /// Owning party identifier
    pub party_id: String,

    /// Transaction payload (must be a non-empty JSON object)
    pub payload: Payload,
}

impl EncryptRequest {
    pub fn new(party_id: impl Into<String>, payload: Payload) -> Self {
        Self {
            party_id: party_id.into(),
            payload,
        }
    }

    /// Check the request shape before anything is encrypted
    pub fn validate(&self) -> Result<()> {
        if self.party_id.is_empty() {
            return Err(VaultError::InvalidRequest("partyId is required".to_string()));
        }

        match self.payload.as_object() {
            Some(object) if !object.is_empty() => Ok(()),
            _ => Err(VaultError::InvalidRequest(
                "payload must be a non-empty object".to_string(),
            )),
        }
    }
}

/// Stored transaction: metadata plus the envelope record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxSecureRecord {
    pub id: Uuid,
    pub party_id: String,
    pub created_at: DateTime<Utc>,

    #[serde(flatten)]
    pub envelope: EncryptedRecord,
}

impl TxSecureRecord {
    /// Wrap a freshly produced envelope record
    pub fn new(party_id: impl Into<String>, envelope: EncryptedRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            party_id: party_id.into(),
            created_at: Utc::now(),
            envelope,
        }
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            id: self.id,
            party_id: self.party_id.clone(),
            created_at: self.created_at,
        }
    }
}

/// Record metadata (safe to display, no ciphertext)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub id: Uuid,
    pub party_id: String,
    pub created_at: DateTime<Utc>,
}

/// A stored transaction with its payload decrypted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptedTransaction {
    pub id: Uuid,
    pub party_id: String,
    pub created_at: DateTime<Utc>,
    pub payload: Payload,
}
