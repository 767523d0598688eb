//! Versioned decoding of the outer payload.
//!
//! Links carry their schema version in the public `v` query parameter. Links
//! issued before versioning have no `v` and may use any of the historical
//! shapes, so they go through a lenient decoder that fills in defaults.

use chrono::NaiveDate;
use sanctuary_crypto::{decrypt_json, EncryptedData, Salt, SymmetricKey};
use sanctuary_license::{Plan, DEFAULT_PASSCODE};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LinkError, LinkResult};
use crate::model::{anniversary_date, Configuration, Note, PartnerNames, DEFAULT_TOTAL_DAYS};

/// Outer payload schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// Unversioned links: optional plan, optional day count, legacy plan names.
    V1,
    /// Current shape, stamped as `v=2`.
    V2,
}

impl SchemaVersion {
    pub const CURRENT: Self = Self::V2;

    /// Maps the `v` query parameter to a schema.
    pub fn from_tag(tag: Option<&str>) -> LinkResult<Self> {
        match tag {
            None | Some("") | Some("1") => Ok(Self::V1),
            Some("2") => Ok(Self::V2),
            Some(other) => Err(LinkError::UnsupportedVersion(other.to_string())),
        }
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::V1 => "1",
            Self::V2 => "2",
        }
    }

    /// Decrypts the outer payload and decodes it with this schema.
    pub fn decrypt(self, key: &SymmetricKey, sealed: &EncryptedData) -> LinkResult<Configuration> {
        match self {
            Self::V2 => Ok(decrypt_json::<Configuration>(key, sealed)?),
            Self::V1 => Ok(decrypt_json::<LegacyConfiguration>(key, sealed)?.into()),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Every field optional; unknown fields ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyConfiguration {
    plan: Option<Plan>,
    names: PartnerNames,
    #[serde(deserialize_with = "lenient_date")]
    anniversary_date: Option<NaiveDate>,
    total_days: Option<u32>,
    spotify_tracks: BTreeMap<String, String>,
    notes: Vec<Note>,
    passcode: Option<String>,
    video_url: Option<String>,
    background_url: Option<String>,
    gallery_images: Option<BTreeMap<String, Vec<String>>>,
    signature: Option<String>,
    passcode_salt: Option<Salt>,
    encrypted_notes: Option<EncryptedData>,
    encrypted_video: Option<EncryptedData>,
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(anniversary_date::parse))
}

impl From<LegacyConfiguration> for Configuration {
    fn from(legacy: LegacyConfiguration) -> Self {
        let tiered = legacy.passcode_salt.is_some();
        Self {
            plan: legacy.plan.unwrap_or_default(),
            names: legacy.names,
            anniversary_date: legacy.anniversary_date.unwrap_or_default(),
            total_days: legacy.total_days.unwrap_or(DEFAULT_TOTAL_DAYS),
            spotify_tracks: legacy.spotify_tracks,
            notes: legacy.notes,
            // Early tiered links still carried the passcode in the outer payload.
            passcode: match legacy.passcode {
                _ if tiered => String::new(),
                Some(code) => code,
                None => DEFAULT_PASSCODE.to_string(),
            },
            video_url: legacy.video_url.filter(|url| !url.is_empty()),
            background_url: legacy.background_url.filter(|url| !url.is_empty()),
            gallery_images: legacy.gallery_images,
            signature: legacy.signature,
            passcode_salt: legacy.passcode_salt,
            encrypted_notes: legacy.encrypted_notes,
            encrypted_video: legacy.encrypted_video,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanctuary_crypto::{encrypt_json, generate_master_key};
    use serde_json::json;

    #[test]
    fn tags_map_to_versions() {
        assert_eq!(SchemaVersion::from_tag(None).unwrap(), SchemaVersion::V1);
        assert_eq!(SchemaVersion::from_tag(Some("2")).unwrap(), SchemaVersion::V2);
        assert!(matches!(
            SchemaVersion::from_tag(Some("9")),
            Err(LinkError::UnsupportedVersion(v)) if v == "9"
        ));
        assert_eq!(SchemaVersion::CURRENT.tag(), "2");
    }

    #[test]
    fn legacy_shape_is_upgraded() {
        let key = generate_master_key();
        let legacy = json!({
            "plan": "pro",
            "names": { "partner1": "Alex", "partner2": "Sam" },
            "anniversaryDate": "2022-07-28",
            "spotifyTracks": { "day12": "", "day14": "abc" },
            "notes": [{ "id": "note1", "day": 12, "content": "Our first note" }],
            "passcode": "1234",
            "videoUrl": ""
        });
        let sealed = encrypt_json(&key, &legacy).unwrap();
        let config = SchemaVersion::V1.decrypt(&key, &sealed).unwrap();

        assert_eq!(config.plan, Plan::Infinite);
        assert_eq!(config.total_days, DEFAULT_TOTAL_DAYS);
        assert_eq!(config.notes[0].content, "Our first note");
        assert_eq!(config.video_url, None);
        assert_eq!(config.anniversary_date, NaiveDate::from_ymd_opt(2022, 7, 28).unwrap());
    }

    #[test]
    fn legacy_tiered_link_drops_outer_passcode() {
        let key = generate_master_key();
        let legacy = json!({
            "names": { "partner1": "Alex", "partner2": "Sam" },
            "anniversaryDate": "2022-07-28T00:00:00.000Z",
            "passcode": "1402",
            "passcodeSalt": "c2FsdA",
            "encryptedNotes": { "ciphertext": "AAAA", "iv": "AAAA" }
        });
        let sealed = encrypt_json(&key, &legacy).unwrap();
        let config = SchemaVersion::V1.decrypt(&key, &sealed).unwrap();
        assert!(config.is_passcode_tiered());
        assert!(config.passcode.is_empty());
        assert_eq!(config.plan, Plan::Free);
    }

    #[test]
    fn current_schema_is_strict() {
        let key = generate_master_key();
        let missing_plan = json!({
            "names": { "partner1": "Alex", "partner2": "Sam" },
            "anniversaryDate": "2022-07-28",
            "totalDays": 14
        });
        let sealed = encrypt_json(&key, &missing_plan).unwrap();
        assert!(matches!(
            SchemaVersion::V2.decrypt(&key, &sealed),
            Err(LinkError::Decryption)
        ));
    }
}
