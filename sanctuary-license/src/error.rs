//! License error types.

use thiserror::Error;

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;

/// Errors that can occur while issuing signatures or loading secrets.
#[derive(Debug, Error)]
pub enum LicenseError {
    #[error("signing secret not configured (set {0})")]
    MissingSecret(&'static str),

    #[error("unknown plan: {0}")]
    InvalidPlan(String),

    #[error("signing failed: {0}")]
    Signing(String),
}
