//! AES-256-GCM authenticated encryption.
//!
//! Every call to [`encrypt`] draws a fresh 96-bit nonce from the OS CSPRNG.
//! There is intentionally no way to pass a nonce in, so nonce reuse under
//! one key cannot be expressed through this API.

use crate::codec::{decode_url_safe, encode_url_safe};
use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKey;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Size of the GCM nonce in bytes (96 bits).
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// A `(ciphertext, nonce)` pair, both Base64URL-encoded.
///
/// The ciphertext carries the authentication tag at its end.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedData {
    pub ciphertext: String,
    pub iv: String,
}

fn cipher_for(key: &SymmetricKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

/// Encrypts raw bytes under `key` with a fresh random nonce.
pub fn encrypt(key: &SymmetricKey, plaintext: &[u8]) -> CryptoResult<EncryptedData> {
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher_for(key)
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    Ok(EncryptedData {
        ciphertext: encode_url_safe(&ciphertext),
        iv: encode_url_safe(&nonce_bytes),
    })
}

/// Decrypts and authenticates data produced by [`encrypt`].
///
/// Malformed Base64URL surfaces as [`CryptoError::Decode`]; everything else
/// (wrong nonce length, truncated ciphertext, tag mismatch) is
/// [`CryptoError::Decryption`].
pub fn decrypt(key: &SymmetricKey, data: &EncryptedData) -> CryptoResult<Zeroizing<Vec<u8>>> {
    let nonce_bytes = decode_url_safe(&data.iv)?;
    let ciphertext = decode_url_safe(&data.ciphertext)?;

    if nonce_bytes.len() != NONCE_SIZE || ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::Decryption);
    }

    cipher_for(key)
        .decrypt(Nonce::from_slice(&nonce_bytes), ciphertext.as_slice())
        .map(Zeroizing::new)
        .map_err(|_| CryptoError::Decryption)
}

/// Serializes `value` to JSON and encrypts it.
pub fn encrypt_json<T: Serialize + ?Sized>(
    key: &SymmetricKey,
    value: &T,
) -> CryptoResult<EncryptedData> {
    let plaintext = Zeroizing::new(serde_json::to_vec(value)?);
    encrypt(key, &plaintext)
}

/// Decrypts a JSON payload and deserializes it into `T`.
///
/// Plaintext that authenticates but does not parse as `T` is reported as
/// [`CryptoError::Decryption`]; no partial value is ever returned.
pub fn decrypt_json<T: DeserializeOwned>(
    key: &SymmetricKey,
    data: &EncryptedData,
) -> CryptoResult<T> {
    let plaintext = decrypt(key, data)?;
    serde_json::from_slice(&plaintext).map_err(|_| CryptoError::Decryption)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::generate_master_key;

    #[test]
    fn ciphertext_carries_tag() {
        let key = generate_master_key();
        let sealed = encrypt(&key, b"hello").unwrap();
        let raw = decode_url_safe(&sealed.ciphertext).unwrap();
        assert_eq!(raw.len(), 5 + TAG_SIZE);
        assert_eq!(decode_url_safe(&sealed.iv).unwrap().len(), NONCE_SIZE);
    }

    #[test]
    fn short_nonce_is_a_decryption_error() {
        let key = generate_master_key();
        let mut sealed = encrypt(&key, b"hello").unwrap();
        sealed.iv = encode_url_safe(&[0u8; 8]);
        assert!(matches!(decrypt(&key, &sealed), Err(CryptoError::Decryption)));
    }

    #[test]
    fn truncated_ciphertext_is_a_decryption_error() {
        let key = generate_master_key();
        let mut sealed = encrypt(&key, b"hello").unwrap();
        sealed.ciphertext = encode_url_safe(&[1, 2, 3]);
        assert!(matches!(decrypt(&key, &sealed), Err(CryptoError::Decryption)));
    }

    #[test]
    fn json_of_wrong_shape_is_a_decryption_error() {
        let key = generate_master_key();
        let sealed = encrypt_json(&key, "just a string").unwrap();
        let result: CryptoResult<Vec<u32>> = decrypt_json(&key, &sealed);
        assert!(matches!(result, Err(CryptoError::Decryption)));
    }

    #[test]
    fn json_roundtrip_preserves_value() {
        let key = generate_master_key();
        let value = serde_json::json!({ "notes": [1, 2, 3], "videoUrl": null });
        let sealed = encrypt_json(&key, &value).unwrap();
        let back: serde_json::Value = decrypt_json(&key, &sealed).unwrap();
        assert_eq!(back, value);
    }
}
