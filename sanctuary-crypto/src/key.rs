//! Master key generation, export and import.

use crate::codec::{decode_url_safe, encode_url_safe};
use crate::error::{CryptoError, CryptoResult};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a symmetric key in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// A 256-bit AES key, either random (master tier) or passcode-derived.
///
/// The key is zeroized when dropped and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
}

impl SymmetricKey {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the raw key bytes. Never log or persist these.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SymmetricKey([REDACTED])")
    }
}

/// Generates a fresh master key from the operating system CSPRNG.
pub fn generate_master_key() -> SymmetricKey {
    let mut bytes = [0u8; KEY_SIZE];
    OsRng.fill_bytes(&mut bytes);
    let key = SymmetricKey::from_bytes(bytes);
    bytes.zeroize();
    key
}

/// Serializes a key as Base64URL for the URL fragment.
pub fn export_key(key: &SymmetricKey) -> String {
    encode_url_safe(key.as_bytes())
}

/// Parses a key exported with [`export_key`].
pub fn import_key(encoded: &str) -> CryptoResult<SymmetricKey> {
    let mut raw = decode_url_safe(encoded)?;
    if raw.len() != KEY_SIZE {
        let actual = raw.len();
        raw.zeroize();
        return Err(CryptoError::KeyImport {
            expected: KEY_SIZE,
            actual,
        });
    }

    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(&raw);
    raw.zeroize();
    let key = SymmetricKey::from_bytes(bytes);
    bytes.zeroize();
    Ok(key)
}
