//! Error types for envelope-core

use serde::Serialize;
use thiserror::Error;

/// Result type alias for envelope operations
pub type Result<T> = std::result::Result<T, EnvelopeError>;

/// Envelope error types
#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("Invalid master key: {0}")]
    InvalidMasterKey(String),

    #[error("Validation failed: {}", join_field_errors(.0))]
    ValidationFailed(Vec<FieldError>),

    /// Authentication failed while unwrapping the DEK or the payload.
    ///
    /// A wrong master key and a modified ciphertext, tag or wrapped key are
    /// deliberately indistinguishable.
    #[error("Decryption failed: data has been tampered with")]
    TamperDetected,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Entropy source failure: {0}")]
    EntropySourceFailure(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EnvelopeError {
    /// Field errors carried by [`EnvelopeError::ValidationFailed`], empty otherwise
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::ValidationFailed(errors) => errors,
            _ => &[],
        }
    }
}

/// Why a record field was rejected by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    InvalidHex,
    InvalidNonceLength,
    InvalidTagLength,
    EmptyCiphertext,
}

impl ValidationReason {
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidHex => "Invalid hex format",
            Self::InvalidNonceLength => "Nonce must be exactly 12 bytes",
            Self::InvalidTagLength => "Tag must be exactly 16 bytes",
            Self::EmptyCiphertext => "Ciphertext cannot be empty",
        }
    }
}

impl std::fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// A single `(field, reason)` validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Record field name, e.g. `payload_nonce`
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl FieldError {
    pub fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
