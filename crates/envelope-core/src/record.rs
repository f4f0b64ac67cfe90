//! The persisted envelope record
//!
//! Six hex fields plus two scalar tags:
//!
//! ```text
//! payload_nonce   hex[24]    12 bytes
//! payload_ct      hex[even]  variable
//! payload_tag     hex[32]    16 bytes
//! dek_wrap_nonce  hex[24]    12 bytes
//! dek_wrapped     hex[64]    32 bytes
//! dek_wrap_tag    hex[32]    16 bytes
//! alg             "AES-256-GCM"
//! mk_version      1
//! ```

use serde::{Deserialize, Serialize};

/// Algorithm tag written into every record
pub const ALGORITHM: &str = "AES-256-GCM";

/// Master key generation written into every record
pub const MK_VERSION: u32 = 1;

/// Envelope-encrypted payload as stored and transmitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRecord {
    pub payload_nonce: String,
    pub payload_ct: String,
    pub payload_tag: String,
    pub dek_wrap_nonce: String,
    pub dek_wrapped: String,
    pub dek_wrap_tag: String,
    pub alg: String,
    pub mk_version: u32,
}
