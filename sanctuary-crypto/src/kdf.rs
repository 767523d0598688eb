//! Passcode key derivation (PBKDF2-HMAC-SHA256).
//!
//! Sanctuary passcodes are four digits, so the whole space is 10,000 guesses.
//! The iteration count is the only thing standing between an offline
//! attacker holding the link and the passcode tier. That is an accepted
//! limitation of the product, not something this module tries to hide.

use crate::codec::encode_url_safe;
use crate::error::{CryptoError, CryptoResult};
use crate::key::{SymmetricKey, KEY_SIZE};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::Zeroize;

/// Default PBKDF2 iteration count (OWASP 2023 guidance for SHA-256).
pub const DEFAULT_ITERATIONS: u32 = 310_000;

/// Number of random bytes behind a freshly generated salt.
pub const SALT_SIZE: usize = 16;

/// Parameters for passcode key derivation.
///
/// Both the packaging side and the unlocking side must agree on these; the
/// iteration count is not carried inside the link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Creates parameters with a custom iteration count.
    pub fn new(iterations: u32) -> CryptoResult<Self> {
        if iterations == 0 {
            return Err(CryptoError::KeyDerivation(
                "iteration count must be positive".to_string(),
            ));
        }
        Ok(Self { iterations })
    }
}

/// Salt for passcode derivation.
///
/// Stored as text because the salt rides inside the JSON configuration and
/// is fed to PBKDF2 as its UTF-8 bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Salt(String);

impl Salt {
    /// Generates a fresh random salt (16 bytes, Base64URL-encoded).
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(encode_url_safe(&bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Salt {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Salt {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Derives a 256-bit key from a passcode and salt.
///
/// Deliberately slow. A wrong passcode or garbage salt still yields a key;
/// the mismatch only shows up when decryption fails authentication.
pub fn derive_key(passcode: &str, salt: &Salt, params: &KdfParams) -> SymmetricKey {
    let mut out = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        passcode.as_bytes(),
        salt.as_str().as_bytes(),
        params.iterations,
        &mut out,
    );
    let key = SymmetricKey::from_bytes(out);
    out.zeroize();
    key
}
