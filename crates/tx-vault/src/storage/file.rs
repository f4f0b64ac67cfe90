//! JSON file storage backend
//!
//! Keeps every record in a single `records.json` in the data directory.
//! Records are already envelope-encrypted, so the file holds no plaintext.

use async_trait::async_trait;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::RecordStore;
use crate::error::{Result, VaultError};
use crate::transaction::TxSecureRecord;

const STORE_FILE_VERSION: u32 = 1;

/// File-backed record store
pub struct FileStore {
    /// Directory holding `records.json`
    storage_dir: PathBuf,
    /// In-memory copy of the file contents
    records: RwLock<HashMap<Uuid, TxSecureRecord>>,
}

/// File format for persistent storage
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    records: Vec<TxSecureRecord>,
}

impl FileStore {
    /// Create a store in the default data directory
    pub fn new() -> Result<Self> {
        Self::with_dir(Self::default_dir()?)
    }

    /// Create with a custom storage directory, reading any existing records
    ///
    /// Records already on disk are loaded here so that the first write never
    /// replaces them with a partial set.
    pub fn with_dir(storage_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&storage_dir)?;

        let path = storage_dir.join("records.json");
        let records = if path.exists() {
            parse_store_file(&std::fs::read_to_string(&path)?)?
        } else {
            HashMap::new()
        };

        debug!(
            "File record store initialized at {:?} with {} records",
            storage_dir,
            records.len()
        );

        Ok(Self {
            storage_dir,
            records: RwLock::new(records),
        })
    }

    /// Get the default storage directory
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "symbia-labs", "tx-vault")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                VaultError::StorageError("Could not determine data directory".to_string())
            })
    }

    fn store_file_path(&self) -> PathBuf {
        self.storage_dir.join("records.json")
    }

    /// Get the storage directory path
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// Reload records from disk, replacing the in-memory copy
    pub async fn load(&self) -> Result<()> {
        let path = self.store_file_path();

        if !path.exists() {
            debug!("No existing record file found");
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&path).await?;
        let loaded = parse_store_file(&contents)?;

        let mut records = self.records.write().await;
        *records = loaded;

        debug!("Loaded {} records from storage", records.len());
        Ok(())
    }

    /// Write the in-memory records to disk atomically
    async fn save(&self, records: &HashMap<Uuid, TxSecureRecord>) -> Result<()> {
        let mut sorted: Vec<TxSecureRecord> = records.values().cloned().collect();
        sorted.sort_by_key(|r| (r.created_at, r.id));

        let file = StoreFile {
            version: STORE_FILE_VERSION,
            records: sorted,
        };

        let contents = serde_json::to_string_pretty(&file)?;
        let path = self.store_file_path();

        // Write atomically using a temp file
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &path).await?;

        debug!("Saved {} records to storage", records.len());
        Ok(())
    }
}

fn parse_store_file(contents: &str) -> Result<HashMap<Uuid, TxSecureRecord>> {
    let file: StoreFile = serde_json::from_str(contents)?;

    if file.version != STORE_FILE_VERSION {
        return Err(VaultError::StorageError(format!(
            "Unsupported record file version: {}",
            file.version
        )));
    }

    Ok(file.records.into_iter().map(|r| (r.id, r)).collect())
}

#[async_trait]
impl RecordStore for FileStore {
    async fn insert(&self, record: &TxSecureRecord) -> Result<()> {
        let mut records = self.records.write().await;

        if records.contains_key(&record.id) {
            return Err(VaultError::StorageError(format!(
                "Duplicate record id: {}",
                record.id
            )));
        }

        records.insert(record.id, record.clone());

        if let Err(e) = self.save(&records).await {
            records.remove(&record.id);
            return Err(e);
        }

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
        let mut records = self.records.write().await;

        let Some(removed) = records.remove(&id) else {
            return Ok(false);
        };

        if let Err(e) = self.save(&records).await {
            records.insert(id, removed);
            return Err(e);
        }

        debug!("Deleted record: {}", id);
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "JSON File Storage"
    }
}
