//! Cryptographic primitives for envelope encryption
//!
//! This module provides:
//! - AES-256-GCM seal/open with detached nonce and tag
//! - Master and data-encryption keys with zeroize-on-drop

pub mod codec;
mod keys;

pub use codec::{open, seal, CodecError, Sealed, KEY_LEN, NONCE_LEN, TAG_LEN};
pub use keys::{DataKey, MasterKey};

use crate::error::EnvelopeError;

impl From<CodecError> for EnvelopeError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::InvalidInput(reason) => EnvelopeError::InvalidInput(reason),
            CodecError::AuthenticationFailure => EnvelopeError::TamperDetected,
            CodecError::EntropySource(reason) => EnvelopeError::EntropySourceFailure(reason),
        }
    }
}
