//! Plan tiers.

use crate::error::LicenseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The passcode every new sanctuary starts with.
///
/// Leaving it unchanged means the creator never chose a secret, so there is
/// nothing worth gating behind it.
pub const DEFAULT_PASSCODE: &str = "1234";

/// Purchased plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    /// Base tier.
    #[default]
    #[serde(alias = "spark")]
    Free,
    /// Mid tier.
    Plus,
    /// Top tier.
    #[serde(alias = "pro")]
    Infinite,
}

impl Plan {
    /// Canonical identifier used on the wire and in signatures.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Plus => "plus",
            Self::Infinite => "infinite",
        }
    }

    /// Name this tier was issued under before the rename, if any.
    ///
    /// Signatures issued back then cover this name instead of [`Plan::as_str`].
    #[must_use]
    pub fn legacy_name(self) -> Option<&'static str> {
        match self {
            Self::Free => Some("spark"),
            Self::Plus => None,
            Self::Infinite => Some("pro"),
        }
    }

    /// Name shown at checkout.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Free => "The Spark Plan",
            Self::Plus => "The Romance Plan",
            Self::Infinite => "The Sanctuary Plan",
        }
    }

    /// Price in US cents, `None` for the free tier.
    #[must_use]
    pub fn price_cents(self) -> Option<u32> {
        match self {
            Self::Free => None,
            Self::Plus => Some(499),
            Self::Infinite => Some(999),
        }
    }

    #[must_use]
    pub fn is_paid(self) -> bool {
        self.price_cents().is_some()
    }

    /// The insecure-by-convention default passcode for this plan.
    #[must_use]
    pub fn default_passcode(self) -> &'static str {
        DEFAULT_PASSCODE
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Plan {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" | "spark" => Ok(Self::Free),
            "plus" => Ok(Self::Plus),
            "infinite" | "pro" => Ok(Self::Infinite),
            other => Err(LicenseError::InvalidPlan(other.to_string())),
        }
    }
}
