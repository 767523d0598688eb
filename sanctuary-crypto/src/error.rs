//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while encoding, deriving, encrypting or decrypting.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Input is not valid Base64URL.
    #[error("malformed base64url input: {0}")]
    Decode(String),

    /// Imported key material has the wrong length.
    #[error("invalid key length: expected {expected}, got {actual}")]
    KeyImport { expected: usize, actual: usize },

    /// Authentication failed. Deliberately silent about whether the key was
    /// wrong or the data was modified.
    #[error("decryption failed")]
    Decryption,

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
