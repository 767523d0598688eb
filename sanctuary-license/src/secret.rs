//! Server-side signing secret.

use crate::error::{LicenseError, LicenseResult};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Environment variable holding the signing secret.
pub const SIGNING_SECRET_ENV: &str = "SANCTUARY_SIGNING_SECRET";

/// HMAC secret shared by the issuing and verifying endpoints.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    /// Loads the secret from [`SIGNING_SECRET_ENV`].
    ///
    /// There is no development fallback: an unset or empty variable is an error.
    pub fn from_env() -> LicenseResult<Self> {
        match std::env::var(SIGNING_SECRET_ENV) {
            Ok(value) if !value.is_empty() => Ok(Self::new(value)),
            _ => Err(LicenseError::MissingSecret(SIGNING_SECRET_ENV)),
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}
