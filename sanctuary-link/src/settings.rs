//! Link packaging/opening settings.

use sanctuary_crypto::KdfParams;
use serde::{Deserialize, Serialize};

use crate::error::{LinkError, LinkResult};

/// Environment variable overriding [`LinkSettings::origin`].
pub const ORIGIN_ENV: &str = "SANCTUARY_ORIGIN";

/// Environment variable overriding the passcode derivation iteration count.
pub const KDF_ITERATIONS_ENV: &str = "SANCTUARY_KDF_ITERATIONS";

/// Settings shared by the packaging and viewing sides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSettings {
    /// Base URL of the viewer (e.g., "https://sanctuary.example").
    pub origin: String,

    /// Passcode derivation parameters. Must match between creator and viewer.
    pub kdf: KdfParams,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            kdf: KdfParams::default(),
        }
    }
}

impl LinkSettings {
    /// Defaults overlaid with [`ORIGIN_ENV`] and [`KDF_ITERATIONS_ENV`].
    pub fn from_env() -> LinkResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`LinkSettings::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LinkResult<Self> {
        let mut settings = Self::default();

        if let Some(origin) = lookup(ORIGIN_ENV).filter(|s| !s.trim().is_empty()) {
            settings = settings.with_origin(origin.trim())?;
        }

        if let Some(raw) = lookup(KDF_ITERATIONS_ENV).filter(|s| !s.trim().is_empty()) {
            let iterations: u32 = raw.trim().parse().map_err(|_| {
                LinkError::InvalidConfiguration(format!("{KDF_ITERATIONS_ENV} is not a number: {raw}"))
            })?;
            settings.kdf = KdfParams::new(iterations)
                .map_err(|e| LinkError::InvalidConfiguration(e.to_string()))?;
        }

        Ok(settings)
    }

    /// Replaces the origin after checking it parses as an absolute URL.
    pub fn with_origin(mut self, origin: &str) -> LinkResult<Self> {
        url::Url::parse(origin)
            .map_err(|e| LinkError::InvalidConfiguration(format!("invalid origin {origin}: {e}")))?;
        self.origin = origin.to_string();
        Ok(self)
    }

    #[must_use]
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }
}
