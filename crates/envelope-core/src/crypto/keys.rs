//! Key material with automatic zeroization

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::codec::{fill_random, KEY_LEN};
use crate::error::{EnvelopeError, Result};

/// Long-lived key that wraps per-record DEKs - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a master key from raw bytes
    pub fn new(key: [u8; KEY_LEN]) -> Self {
        Self { key }
    }

    /// Decode a master key from its 64-character hex form
    pub fn from_hex(hex_key: &str) -> Result<Self> {
        let decoded = Zeroizing::new(hex::decode(hex_key).map_err(|_| {
            EnvelopeError::InvalidMasterKey("not a valid hex string".to_string())
        })?);

        if decoded.len() != KEY_LEN {
            return Err(EnvelopeError::InvalidMasterKey(format!(
                "must be {} bytes ({} hex characters), got {} bytes",
                KEY_LEN,
                KEY_LEN * 2,
                decoded.len()
            )));
        }

        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&decoded);
        Ok(Self { key })
    }

    /// Generate a new random master key
    pub fn generate() -> Result<Self> {
        let mut key = [0u8; KEY_LEN];
        fill_random(&mut key)?;
        Ok(Self { key })
    }

    /// Hex form of the key, suitable for provisioning via `MASTER_KEY`
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.key))
    }

    /// Get the key bytes (use carefully - avoid copying)
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Per-record data-encryption key - automatically zeroed when dropped
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DataKey {
    key: [u8; KEY_LEN],
}

impl DataKey {
    /// Generate a fresh random DEK
    pub fn generate() -> Result<Self> {
        let mut key = [0u8; KEY_LEN];
        fill_random(&mut key)?;
        Ok(Self { key })
    }

    /// Create from a slice (must be exactly 32 bytes)
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != KEY_LEN {
            return None;
        }
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(slice);
        Some(Self { key })
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.key
    }
}

impl std::fmt::Debug for DataKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_key_from_hex() {
        let key = MasterKey::from_hex(&"ab".repeat(32)).unwrap();
        assert_eq!(key.as_bytes(), &[0xab; 32]);
    }

    #[test]
    fn test_master_key_from_hex_accepts_uppercase() {
        let key = MasterKey::from_hex(&"AB".repeat(32)).unwrap();
        assert_eq!(key.as_bytes(), &[0xab; 32]);
    }

    #[test]
    fn test_master_key_rejects_16_bytes() {
        let result = MasterKey::from_hex(&"a".repeat(32));
        assert!(matches!(result, Err(EnvelopeError::InvalidMasterKey(_))));
    }

    #[test]
    fn test_master_key_rejects_non_hex() {
        assert!(matches!(
            MasterKey::from_hex("INVALID_KEY"),
            Err(EnvelopeError::InvalidMasterKey(_))
        ));
        assert!(matches!(
            MasterKey::from_hex(&"g".repeat(64)),
            Err(EnvelopeError::InvalidMasterKey(_))
        ));
        assert!(matches!(
            MasterKey::from_hex(""),
            Err(EnvelopeError::InvalidMasterKey(_))
        ));
    }

    #[test]
    fn test_generated_master_key_hex_roundtrip() {
        let key = MasterKey::generate().unwrap();
        let hex_key = key.to_hex();
        assert_eq!(hex_key.len(), 64);

        let parsed = MasterKey::from_hex(&hex_key).unwrap();
        assert_eq!(parsed.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_generated_data_keys_differ() {
        let dek1 = DataKey::generate().unwrap();
        let dek2 = DataKey::generate().unwrap();
        assert_ne!(dek1.as_bytes(), dek2.as_bytes());
    }

    #[test]
    fn test_data_key_from_invalid_slice() {
        assert!(DataKey::from_slice(&[1u8; 16]).is_none());
        assert!(DataKey::from_slice(&[1u8; 32]).is_some());
    }

    #[test]
    fn test_debug_redacted() {
        let master = MasterKey::new([0x5a; 32]);
        let debug = format!("{:?}", master);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("90"));

        let dek = DataKey::from_slice(&[0x5a; 32]).unwrap();
        assert!(format!("{:?}", dek).contains("REDACTED"));
    }
}
