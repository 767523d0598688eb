//! Sanctuary configuration model.
//!
//! Field names follow the camelCase JSON shape the viewer reads.

use chrono::NaiveDate;
use sanctuary_crypto::{EncryptedData, Salt};
use sanctuary_license::{Plan, SigningSecret, DEFAULT_PASSCODE};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{LinkError, LinkResult};

/// Days counted down to and including February 14th when not specified.
pub const DEFAULT_TOTAL_DAYS: u32 = 14;

/// Highest calendar day a note can target.
pub const MAX_NOTE_DAY: u8 = 31;

/// Display names of the couple.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartnerNames {
    pub partner1: String,
    pub partner2: String,
}

impl PartnerNames {
    pub fn new(partner1: impl Into<String>, partner2: impl Into<String>) -> Self {
        Self {
            partner1: partner1.into(),
            partner2: partner2.into(),
        }
    }
}

/// A message that unlocks on a given February day (and optionally hour).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub day: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hour: Option<u8>,
    pub content: String,
    #[serde(default, rename = "isSpotify", skip_serializing_if = "std::ops::Not::not")]
    pub linked_to_track: bool,
    #[serde(default, rename = "spotifyId", skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,
}

impl Note {
    /// Creates a note with a fresh random id.
    pub fn new(day: u8, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            day,
            hour: None,
            content: content.into(),
            linked_to_track: false,
            track_id: None,
        }
    }

    #[must_use]
    pub fn at_hour(mut self, hour: u8) -> Self {
        self.hour = Some(hour);
        self
    }

    #[must_use]
    pub fn with_track(mut self, track_id: impl Into<String>) -> Self {
        self.linked_to_track = true;
        self.track_id = Some(track_id.into());
        self
    }
}

/// The complete sanctuary definition carried inside a link.
///
/// `passcode_salt`, `encrypted_notes` and `encrypted_video` only appear in
/// the outer payload of a passcode-tiered link. While they are present the
/// plaintext `notes`, `video_url` and `passcode` are empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub plan: Plan,
    pub names: PartnerNames,
    #[serde(with = "anniversary_date")]
    pub anniversary_date: NaiveDate,
    pub total_days: u32,
    #[serde(default)]
    pub spotify_tracks: BTreeMap<String, String>,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub passcode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery_images: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passcode_salt: Option<Salt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_notes: Option<EncryptedData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_video: Option<EncryptedData>,
}

impl Configuration {
    /// Creates an empty configuration with the default passcode.
    pub fn new(plan: Plan, names: PartnerNames, anniversary_date: NaiveDate) -> Self {
        Self {
            plan,
            names,
            anniversary_date,
            total_days: DEFAULT_TOTAL_DAYS,
            spotify_tracks: BTreeMap::new(),
            notes: Vec::new(),
            passcode: DEFAULT_PASSCODE.to_string(),
            video_url: None,
            background_url: None,
            gallery_images: None,
            signature: None,
            passcode_salt: None,
            encrypted_notes: None,
            encrypted_video: None,
        }
    }

    /// Whether the passcode tier artifacts are attached.
    #[must_use]
    pub fn is_passcode_tiered(&self) -> bool {
        self.passcode_salt.is_some()
    }

    /// Whether the creator left the plan's default passcode in place.
    #[must_use]
    pub fn uses_default_passcode(&self) -> bool {
        self.passcode == self.plan.default_passcode()
    }

    /// Checks the premium signature against the partner names.
    ///
    /// Advisory only: use it for badges, never to gate features.
    #[must_use]
    pub fn verify_signature(&self, secret: &SigningSecret) -> bool {
        self.signature.as_deref().is_some_and(|sig| {
            sanctuary_license::verify(
                self.plan,
                &self.names.partner1,
                &self.names.partner2,
                sig,
                secret,
            )
        })
    }

    /// Every uploaded asset the configuration points at: background, video,
    /// then gallery images in key order.
    ///
    /// A locked sanctuary has no plaintext video, so it is missing here
    /// until the passcode tier is opened.
    #[must_use]
    pub fn media_urls(&self) -> Vec<&str> {
        let gallery = self.gallery_images.iter().flat_map(|days| days.values().flatten());
        self.background_url
            .iter()
            .chain(self.video_url.iter())
            .chain(gallery)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
            .collect()
    }

    /// Validates an authored (not yet packaged) configuration.
    pub fn validate(&self) -> LinkResult<()> {
        if self.is_passcode_tiered() || self.encrypted_notes.is_some() {
            return Err(LinkError::InvalidConfiguration(
                "configuration already carries passcode-tier artifacts".to_string(),
            ));
        }
        if self.names.partner1.trim().is_empty() || self.names.partner2.trim().is_empty() {
            return Err(LinkError::InvalidConfiguration(
                "both partner names are required".to_string(),
            ));
        }
        if self.total_days == 0 {
            return Err(LinkError::InvalidConfiguration(
                "total days must be positive".to_string(),
            ));
        }
        if self.passcode.len() != 4 || !self.passcode.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LinkError::InvalidConfiguration(
                "passcode must be exactly 4 digits".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for note in &self.notes {
            if note.id.is_empty() || !seen.insert(note.id.as_str()) {
                return Err(LinkError::InvalidConfiguration(format!(
                    "note id {:?} is empty or duplicated",
                    note.id
                )));
            }
            if !(1..=MAX_NOTE_DAY).contains(&note.day) {
                return Err(LinkError::InvalidConfiguration(format!(
                    "note {} targets day {}, expected 1-{MAX_NOTE_DAY}",
                    note.id, note.day
                )));
            }
            if note.hour.is_some_and(|h| h > 23) {
                return Err(LinkError::InvalidConfiguration(format!(
                    "note {} has an hour outside 0-23",
                    note.id
                )));
            }
            if note.linked_to_track && note.track_id.is_none() {
                return Err(LinkError::InvalidConfiguration(format!(
                    "note {} is linked to a track but has no track id",
                    note.id
                )));
            }
        }
        Ok(())
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp; always writes `YYYY-MM-DD`.
pub(crate) mod anniversary_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|dt| dt.date())
            })
    }
}
