//! # envelope-core
//!
//! Two-tier envelope encryption for structured payloads:
//! - AES-256-GCM codec with detached nonce and tag
//! - Per-record data-encryption keys wrapped under a master key
//! - Structural validation of the hex wire record before any decryption
//! - Key material zeroized on drop

pub mod crypto;
pub mod envelope;
pub mod error;
pub mod record;
pub mod validation;

pub use crypto::{DataKey, MasterKey, Sealed};
pub use envelope::{decrypt, encrypt, Payload};
pub use error::{EnvelopeError, FieldError, Result, ValidationReason};
pub use record::{EncryptedRecord, ALGORITHM, MK_VERSION};
pub use validation::validate_record;
