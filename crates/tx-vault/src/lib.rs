//! # tx-vault
//!
//! Transaction vault built on envelope-core:
//! - Request validation for party transaction payloads
//! - Envelope-encrypted records keyed by id and party
//! - In-memory and JSON file storage backends
//! - Master key provisioning from the environment

pub mod error;
pub mod service;
pub mod settings;
pub mod storage;
pub mod transaction;

pub use error::{Result, VaultError};
pub use service::TransactionService;
pub use settings::{
    check_master_key_format, master_key_from_env, Settings, SettingsManager, MASTER_KEY_ENV,
};
pub use storage::{FileStore, MemoryStore, RecordStore};
pub use transaction::{DecryptedTransaction, EncryptRequest, RecordSummary, TxSecureRecord};
