//! AES-256-GCM authenticated encryption with a detached nonce and tag
//!
//! - Nonce: 12 bytes (96 bits), fresh from the OS CSPRNG on every seal
//! - Tag: 16 bytes (128 bits), kept separate from the ciphertext
//! - Ciphertext: same length as the plaintext
//!
//! No associated data is bound. `open` verifies the tag before the keystream is
//! applied, so a failed open never releases decrypted bytes.

use aes_gcm::{
    aead::{AeadInPlace, KeyInit},
    Aes256Gcm, Nonce, Tag,
};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;
use zeroize::Zeroizing;

/// Byte length of an AES-256 key
pub const KEY_LEN: usize = 32;

/// Byte length of a GCM nonce
pub const NONCE_LEN: usize = 12;

/// Byte length of a GCM authentication tag
pub const TAG_LEN: usize = 16;

/// Errors produced by the codec
#[derive(Debug, Error)]
pub enum CodecError {
    /// Key, nonce or tag has the wrong size.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The tag did not verify under the supplied key and nonce.
    #[error("authentication failed")]
    AuthenticationFailure,

    #[error("entropy source unavailable: {0}")]
    EntropySource(String),
}

/// Output of [`seal`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub ciphertext: Vec<u8>,
    pub nonce: [u8; NONCE_LEN],
    pub tag: [u8; TAG_LEN],
}

/// Encrypt `plaintext` under a 256-bit `key` with a freshly generated nonce
pub fn seal(plaintext: &[u8], key: &[u8]) -> Result<Sealed, CodecError> {
    let cipher = build_cipher(key)?;

    let mut nonce = [0u8; NONCE_LEN];
    fill_random(&mut nonce)?;

    let mut ciphertext = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), &[], &mut ciphertext)
        .map_err(|_| CodecError::InvalidInput("plaintext too long for AES-GCM".to_string()))?;

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(&tag);

    Ok(Sealed {
        ciphertext,
        nonce,
        tag: tag_bytes,
    })
}

/// Verify `tag` over `ciphertext` and decrypt it
///
/// The returned buffer is zeroized when dropped.
pub fn open(
    ciphertext: &[u8],
    key: &[u8],
    nonce: &[u8],
    tag: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CodecError> {
    let cipher = build_cipher(key)?;

    if nonce.len() != NONCE_LEN {
        return Err(CodecError::InvalidInput(format!(
            "nonce must be {} bytes, got {}",
            NONCE_LEN,
            nonce.len()
        )));
    }
    if tag.len() != TAG_LEN {
        return Err(CodecError::InvalidInput(format!(
            "tag must be {} bytes, got {}",
            TAG_LEN,
            tag.len()
        )));
    }

    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(nonce),
            &[],
            &mut buffer[..],
            Tag::from_slice(tag),
        )
        .map_err(|_| CodecError::AuthenticationFailure)?;

    Ok(buffer)
}

/// Fill `buf` from the OS CSPRNG
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<(), CodecError> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| CodecError::EntropySource(e.to_string()))
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm, CodecError> {
    if key.len() != KEY_LEN {
        return Err(CodecError::InvalidInput(format!(
            "key must be {} bytes, got {}",
            KEY_LEN,
            key.len()
        )));
    }
    Aes256Gcm::new_from_slice(key).map_err(|e| CodecError::InvalidInput(e.to_string()))
}
