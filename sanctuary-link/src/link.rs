//! Shareable URL format.
//!
//! ```text
//! <origin>?d=<ciphertext>&iv=<nonce>&v=<schema>#<master key>
//! ```
//!
//! The master key lives only in the fragment. Browsers never include the
//! fragment in HTTP requests, so the server that hosts the viewer never sees
//! the key.

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{LinkError, LinkResult};

/// Query parameter names that would indicate key material in the query.
const FORBIDDEN_QUERY_KEYS: [&str; 3] = ["k", "key", "masterKey"];

/// The public part of a link, as it appears in the query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctuaryPayload {
    /// Outer ciphertext, Base64URL.
    pub d: String,
    /// Outer nonce, Base64URL.
    pub iv: String,
    /// Schema version or other public metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,
}

/// A parsed or freshly built link: public payload plus the fragment key.
#[derive(Clone, PartialEq, Eq)]
pub struct SanctuaryLink {
    payload: SanctuaryPayload,
    key: String,
}

impl SanctuaryLink {
    pub fn new(payload: SanctuaryPayload, key: String) -> Self {
        Self { payload, key }
    }

    pub fn payload(&self) -> &SanctuaryPayload {
        &self.payload
    }

    /// The exported master key from the fragment.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Renders the full URL against `origin`, replacing any existing query
    /// and fragment on it.
    pub fn to_url(&self, origin: &str) -> LinkResult<String> {
        let mut url = Url::parse(origin).map_err(|e| LinkError::InvalidUrl(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(LinkError::InvalidUrl(format!("{origin} cannot host a sanctuary")));
        }

        url.set_query(None);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("d", &self.payload.d);
            query.append_pair("iv", &self.payload.iv);
            if let Some(v) = &self.payload.v {
                query.append_pair("v", v);
            }
        }
        url.set_fragment(Some(&self.key));
        Ok(url.into())
    }

    /// Extracts `d`, `iv`, `v` from the query and the key from the fragment.
    ///
    /// Unrelated query parameters (tracking tags and the like) are ignored.
    /// A link that carries anything key-like in its query is rejected outright.
    pub fn parse(input: &str) -> LinkResult<Self> {
        let url = Url::parse(input.trim()).map_err(|e| LinkError::InvalidUrl(e.to_string()))?;

        let mut d = None;
        let mut iv = None;
        let mut v = None;
        for (name, value) in url.query_pairs() {
            match &*name {
                "d" if d.is_none() => d = Some(value.into_owned()),
                "iv" if iv.is_none() => iv = Some(value.into_owned()),
                "v" if v.is_none() => v = Some(value.into_owned()),
                "d" | "iv" | "v" => {
                    return Err(LinkError::InvalidUrl(format!("duplicate `{name}` parameter")));
                }
                other if FORBIDDEN_QUERY_KEYS.contains(&other) => {
                    return Err(LinkError::InvalidUrl(
                        "key material must only appear in the fragment".to_string(),
                    ));
                }
                _ => {}
            }
        }

        let d = d.filter(|s| !s.is_empty()).ok_or(LinkError::MissingParameter("d"))?;
        let iv = iv.filter(|s| !s.is_empty()).ok_or(LinkError::MissingParameter("iv"))?;
        let key = url
            .fragment()
            .filter(|f| !f.is_empty())
            .ok_or(LinkError::MissingParameter("key"))?
            .to_string();

        debug!(version = %v.as_deref().unwrap_or("none"), "parsed sanctuary link");
        Ok(Self {
            payload: SanctuaryPayload { d, iv, v },
            key,
        })
    }
}

impl std::fmt::Debug for SanctuaryLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanctuaryLink")
            .field("payload", &self.payload)
            .field("key", &"[REDACTED]")
            .finish()
    }
}
