//! Envelope encryption of structured payloads
//!
//! Each payload is sealed under a fresh data-encryption key (DEK), and the DEK
//! is sealed under the master key. The master key only ever encrypts 32 random
//! bytes, never payload data.
//!
//! Both operations decode the master key on every call; nothing is cached
//! between calls, so they can run concurrently without coordination.

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::{codec, DataKey, MasterKey, KEY_LEN};
use crate::error::{EnvelopeError, Result};
use crate::record::{EncryptedRecord, ALGORITHM, MK_VERSION};
use crate::validation::validate_record;

/// Default payload type: any JSON value
pub type Payload = serde_json::Value;

/// Encrypt `payload` under a fresh DEK and wrap the DEK under the master key
///
/// # Arguments
/// * `payload` - Any value serializable to JSON
/// * `master_key_hex` - 64 hex characters (32 bytes)
///
/// # Returns
/// The assembled record with lowercase hex fields
pub fn encrypt<T>(payload: &T, master_key_hex: &str) -> Result<EncryptedRecord>
where
    T: Serialize + ?Sized,
{
    let master_key = MasterKey::from_hex(master_key_hex)?;
    let dek = DataKey::generate()?;

    let payload_bytes = Zeroizing::new(
        serde_json::to_vec(payload)
            .map_err(|e| EnvelopeError::MalformedPayload(e.to_string()))?,
    );

    let sealed_payload = codec::seal(&payload_bytes, dek.as_bytes())?;
    let wrapped_dek = codec::seal(dek.as_bytes(), master_key.as_bytes())?;
    drop(dek);

    debug!(
        payload_len = payload_bytes.len(),
        "Sealed payload under fresh DEK"
    );

    Ok(EncryptedRecord {
        payload_nonce: hex::encode(sealed_payload.nonce),
        payload_ct: hex::encode(&sealed_payload.ciphertext),
        payload_tag: hex::encode(sealed_payload.tag),
        dek_wrap_nonce: hex::encode(wrapped_dek.nonce),
        dek_wrapped: hex::encode(&wrapped_dek.ciphertext),
        dek_wrap_tag: hex::encode(wrapped_dek.tag),
        alg: ALGORITHM.to_string(),
        mk_version: MK_VERSION,
    })
}

/// Validate `record`, unwrap its DEK and decrypt the payload
///
/// All-or-nothing: any failure returns an error and no partial payload.
pub fn decrypt<T>(record: &EncryptedRecord, master_key_hex: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    let errors = validate_record(record);
    if !errors.is_empty() {
        debug!(count = errors.len(), "Rejected malformed record");
        return Err(EnvelopeError::ValidationFailed(errors));
    }

    let master_key = MasterKey::from_hex(master_key_hex)?;

    let payload_nonce = decode_field("payload_nonce", &record.payload_nonce)?;
    let payload_ct = decode_field("payload_ct", &record.payload_ct)?;
    let payload_tag = decode_field("payload_tag", &record.payload_tag)?;
    let dek_wrap_nonce = decode_field("dek_wrap_nonce", &record.dek_wrap_nonce)?;
    let dek_wrapped = decode_field("dek_wrapped", &record.dek_wrapped)?;
    let dek_wrap_tag = decode_field("dek_wrap_tag", &record.dek_wrap_tag)?;

    let dek_bytes = codec::open(
        &dek_wrapped,
        master_key.as_bytes(),
        &dek_wrap_nonce,
        &dek_wrap_tag,
    )
    .inspect_err(|e| debug!(error = %e, "DEK unwrap failed"))?;
    drop(master_key);

    let dek = DataKey::from_slice(&dek_bytes).ok_or_else(|| {
        EnvelopeError::InvalidInput(format!("unwrapped DEK must be {} bytes", KEY_LEN))
    })?;
    drop(dek_bytes);

    let payload_bytes = codec::open(&payload_ct, dek.as_bytes(), &payload_nonce, &payload_tag)
        .inspect_err(|e| debug!(error = %e, "Payload open failed"))?;
    drop(dek);

    serde_json::from_slice(&payload_bytes)
        .map_err(|e| EnvelopeError::MalformedPayload(e.to_string()))
}

fn decode_field(field: &str, value: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| EnvelopeError::InvalidInput(format!("{}: {}", field, e)))
}
