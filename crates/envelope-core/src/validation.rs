//! Structural validation of record fields
//!
//! Runs before any decryption is attempted. Every check is applied and all
//! failures are collected, so a caller sees each malformed field at once.

use crate::crypto::{NONCE_LEN, TAG_LEN};
use crate::error::{FieldError, ValidationReason};
use crate::record::EncryptedRecord;

/// Record field names for one `(nonce, ciphertext, tag)` triple
#[derive(Debug, Clone, Copy)]
pub struct TripleFields {
    pub nonce: &'static str,
    pub ciphertext: &'static str,
    pub tag: &'static str,
}

/// The payload-under-DEK triple
pub const PAYLOAD_FIELDS: TripleFields = TripleFields {
    nonce: "payload_nonce",
    ciphertext: "payload_ct",
    tag: "payload_tag",
};

/// The DEK-under-master-key triple
pub const DEK_WRAP_FIELDS: TripleFields = TripleFields {
    nonce: "dek_wrap_nonce",
    ciphertext: "dek_wrapped",
    tag: "dek_wrap_tag",
};

/// Non-empty, even length, `[0-9a-fA-F]` only
pub fn is_valid_hex(s: &str) -> bool {
    !s.is_empty() && s.len() % 2 == 0 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

pub fn validate_nonce(field: &'static str, nonce: &str) -> Option<FieldError> {
    if !is_valid_hex(nonce) {
        return Some(FieldError::new(field, ValidationReason::InvalidHex));
    }
    if nonce.len() / 2 != NONCE_LEN {
        return Some(FieldError::new(field, ValidationReason::InvalidNonceLength));
    }
    None
}

pub fn validate_tag(field: &'static str, tag: &str) -> Option<FieldError> {
    if !is_valid_hex(tag) {
        return Some(FieldError::new(field, ValidationReason::InvalidHex));
    }
    if tag.len() / 2 != TAG_LEN {
        return Some(FieldError::new(field, ValidationReason::InvalidTagLength));
    }
    None
}

/// An empty string is reported as `EmptyCiphertext` rather than `InvalidHex`.
///
/// The codec itself accepts a zero-length ciphertext; only the record format
/// rejects it.
pub fn validate_ciphertext(field: &'static str, ciphertext: &str) -> Option<FieldError> {
    if ciphertext.is_empty() {
        return Some(FieldError::new(field, ValidationReason::EmptyCiphertext));
    }
    if !is_valid_hex(ciphertext) {
        return Some(FieldError::new(field, ValidationReason::InvalidHex));
    }
    None
}

/// Check one triple in nonce, tag, ciphertext order
pub fn validate_triple(
    fields: &TripleFields,
    nonce: &str,
    ciphertext: &str,
    tag: &str,
) -> Vec<FieldError> {
    [
        validate_nonce(fields.nonce, nonce),
        validate_tag(fields.tag, tag),
        validate_ciphertext(fields.ciphertext, ciphertext),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Check both triples of a record, payload first
pub fn validate_record(record: &EncryptedRecord) -> Vec<FieldError> {
    let mut errors = validate_triple(
        &PAYLOAD_FIELDS,
        &record.payload_nonce,
        &record.payload_ct,
        &record.payload_tag,
    );
    errors.extend(validate_triple(
        &DEK_WRAP_FIELDS,
        &record.dek_wrap_nonce,
        &record.dek_wrapped,
        &record.dek_wrap_tag,
    ));
    errors
}
