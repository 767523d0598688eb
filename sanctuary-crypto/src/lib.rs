//! Encryption layer for Sanctuary links.
//!
//! Provides the primitives behind a stateless, link-shareable configuration:
//! - Base64URL envelope codec for query strings and fragments
//! - AES-256-GCM authenticated encryption of JSON payloads
//! - PBKDF2-HMAC-SHA256 key derivation from a short passcode
//! - Secure key management with zeroization
//!
//! # Architecture
//!
//! A sanctuary link uses a two-tier key system:
//!
//! 1. **Master Key**: A random 256-bit key generated per link. It travels in
//!    the URL fragment, which browsers never send to a server.
//!
//! 2. **Passcode Key**: Derived from the viewer's passcode and a random salt.
//!    It protects the subset of fields that stay locked until the passcode
//!    is entered.
//!
//! Whoever holds the full URL can read the master tier. The passcode tier
//! only adds the per-guess cost of the derivation on top of that.

pub mod cipher;
pub mod codec;
mod error;
pub mod kdf;
pub mod key;

pub use cipher::{decrypt, decrypt_json, encrypt, encrypt_json, EncryptedData, NONCE_SIZE, TAG_SIZE};
pub use codec::{decode_url_safe, encode_url_safe};
pub use error::{CryptoError, CryptoResult};
pub use kdf::{derive_key, KdfParams, Salt, DEFAULT_ITERATIONS, SALT_SIZE};
pub use key::{export_key, generate_master_key, import_key, SymmetricKey, KEY_SIZE};
