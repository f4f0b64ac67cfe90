//! Error types for tx-vault

use envelope_core::EnvelopeError;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Transaction not found: {0}")]
    NotFound(Uuid),

    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl VaultError {
    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::NotFound(_) => "not_found",
            Self::Envelope(err) => match err {
                EnvelopeError::InvalidMasterKey(_) => "invalid_master_key",
                EnvelopeError::ValidationFailed(_) => "validation_failed",
                EnvelopeError::TamperDetected => "tamper_detected",
                EnvelopeError::MalformedPayload(_) => "malformed_payload",
                EnvelopeError::EntropySourceFailure(_) => "entropy_source_failure",
                EnvelopeError::InvalidInput(_) => "invalid_input",
            },
            Self::StorageError(_) | Self::IoError(_) => "storage_error",
            Self::ConfigError(_) => "config_error",
            Self::SerializationError(_) => "serialization_error",
        }
    }
}
