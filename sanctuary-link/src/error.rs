//! Link error types.

use sanctuary_crypto::CryptoError;
use thiserror::Error;

/// Result type for link operations.
pub type LinkResult<T> = Result<T, LinkError>;

/// Errors surfaced to the viewer/creator boundary.
///
/// Callers pick the wording shown to users through [`LinkError::user_message`];
/// the `Display` text is meant for logs.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("malformed link encoding: {0}")]
    Decode(String),

    #[error("link key has wrong length: expected {expected}, got {actual}")]
    KeyImport { expected: usize, actual: usize },

    #[error("link could not be decrypted")]
    Decryption,

    #[error("incorrect passcode")]
    IncorrectPasscode,

    #[error("sanctuary is not locked")]
    NotLocked,

    #[error("invalid link: {0}")]
    InvalidUrl(String),

    #[error("link is missing `{0}`")]
    MissingParameter(&'static str),

    #[error("unsupported link version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("background task failed: {0}")]
    Task(String),

    #[error("crypto error: {0}")]
    Crypto(CryptoError),
}

impl From<CryptoError> for LinkError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::Decode(msg) => Self::Decode(msg),
            CryptoError::KeyImport { expected, actual } => Self::KeyImport { expected, actual },
            CryptoError::Decryption => Self::Decryption,
            other => Self::Crypto(other),
        }
    }
}

impl LinkError {
    /// Wording for end users.
    ///
    /// Wrong key and tampered data share one message so the viewer cannot be
    /// used as an oracle.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Decode(_)
            | Self::KeyImport { .. }
            | Self::InvalidUrl(_)
            | Self::MissingParameter(_)
            | Self::UnsupportedVersion(_) => "this doesn't look like a valid sanctuary link",
            Self::Decryption => "invalid or corrupted link",
            Self::IncorrectPasscode => "incorrect code, try again",
            Self::NotLocked => "this sanctuary is already unlocked",
            Self::InvalidConfiguration(_) => "this sanctuary is not complete yet",
            Self::Task(_) | Self::Crypto(_) => "something went wrong, please try again",
        }
    }
}
