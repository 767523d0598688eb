//! Two-tier packaging and unlocking.
//!
//! Packaging turns an authored [`Configuration`] into a link. When the
//! creator picked a real passcode, notes and video are first sealed under a
//! passcode-derived key and only the ciphertexts ride in the outer payload.
//! The whole outer payload is then sealed under a fresh master key.
//!
//! Opening reverses the outer layer. A passcode-tiered sanctuary stays
//! [`SanctuaryState::Locked`] until [`OpenedSanctuary::unlock`] succeeds.
//! There is no attempt counter; each guess costs one full key derivation.

use sanctuary_crypto::{
    decrypt_json, derive_key, encrypt_json, export_key, generate_master_key, import_key,
    EncryptedData, KdfParams, Salt,
};
use tracing::{debug, info, warn};

use crate::error::{LinkError, LinkResult};
use crate::link::{SanctuaryLink, SanctuaryPayload};
use crate::model::{Configuration, Note};
use crate::schema::SchemaVersion;
use crate::settings::LinkSettings;

/// Result of packaging: the link and its rendered URL.
#[derive(Clone)]
pub struct PackagedSanctuary {
    link: SanctuaryLink,
    url: String,
    passcode_tiered: bool,
}

impl PackagedSanctuary {
    pub fn link(&self) -> &SanctuaryLink {
        &self.link
    }

    /// The full shareable URL, key included in the fragment.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether notes and video went into the passcode tier.
    pub fn is_passcode_tiered(&self) -> bool {
        self.passcode_tiered
    }
}

impl std::fmt::Debug for PackagedSanctuary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackagedSanctuary")
            .field("link", &self.link)
            .field("url", &"[REDACTED]")
            .field("passcode_tiered", &self.passcode_tiered)
            .finish()
    }
}

/// Viewer-side state of an opened link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanctuaryState {
    /// Outer payload decrypted; notes and video still sealed.
    Locked,
    /// Everything available.
    Unlocked,
}

/// Passcode-tier artifacts copied out of an outer payload.
#[derive(Debug, Clone)]
struct LockedTier {
    salt: Salt,
    notes: EncryptedData,
    video: Option<EncryptedData>,
}

impl LockedTier {
    fn from_config(config: &Configuration) -> LinkResult<Self> {
        match (&config.passcode_salt, &config.encrypted_notes) {
            (Some(salt), Some(notes)) => Ok(Self {
                salt: salt.clone(),
                notes: notes.clone(),
                video: config.encrypted_video.clone(),
            }),
            _ => Err(LinkError::InvalidConfiguration(
                "passcode tier is incomplete".to_string(),
            )),
        }
    }

    /// Both inner payloads must open before anything is returned.
    fn open(&self, passcode: &str, kdf: &KdfParams) -> LinkResult<(Vec<Note>, Option<String>)> {
        let key = derive_key(passcode, &self.salt, kdf);
        let notes: Vec<Note> =
            decrypt_json(&key, &self.notes).map_err(|_| LinkError::IncorrectPasscode)?;
        let video = match &self.video {
            Some(sealed) => decrypt_json::<Option<String>>(&key, sealed)
                .map_err(|_| LinkError::IncorrectPasscode)?,
            None => None,
        };
        Ok((notes, video.filter(|url| !url.is_empty())))
    }
}

/// Moves notes and video into the passcode tier, unless the default
/// passcode is still in place.
fn seal_passcode_tier(config: &Configuration, kdf: &KdfParams) -> LinkResult<Configuration> {
    if config.uses_default_passcode() {
        debug!("default passcode in use, skipping passcode tier");
        return Ok(config.clone());
    }

    let salt = Salt::random();
    let key = derive_key(&config.passcode, &salt, kdf);
    let encrypted_notes = encrypt_json(&key, &config.notes)?;
    // `null` when there is no video; the slot is always present
    let encrypted_video = encrypt_json(&key, &config.video_url)?;

    Ok(Configuration {
        notes: Vec::new(),
        video_url: None,
        passcode: String::new(),
        passcode_salt: Some(salt),
        encrypted_notes: Some(encrypted_notes),
        encrypted_video: Some(encrypted_video),
        ..config.clone()
    })
}

/// Packages a configuration into a shareable link.
pub fn package(config: &Configuration, settings: &LinkSettings) -> LinkResult<PackagedSanctuary> {
    config.validate()?;

    let outer = seal_passcode_tier(config, &settings.kdf)?;
    let passcode_tiered = outer.is_passcode_tiered();

    let master_key = generate_master_key();
    let sealed = encrypt_json(&master_key, &outer)?;

    let link = SanctuaryLink::new(
        SanctuaryPayload {
            d: sealed.ciphertext,
            iv: sealed.iv,
            v: Some(SchemaVersion::CURRENT.tag().to_string()),
        },
        export_key(&master_key),
    );
    let url = link.to_url(&settings.origin)?;

    info!(
        passcode_tiered,
        notes = config.notes.len(),
        payload_chars = link.payload().d.len(),
        "packaged sanctuary"
    );

    Ok(PackagedSanctuary {
        link,
        url,
        passcode_tiered,
    })
}

/// Opens a link and decrypts its outer payload.
pub fn open(url: &str, settings: &LinkSettings) -> LinkResult<OpenedSanctuary> {
    let link = SanctuaryLink::parse(url)?;
    OpenedSanctuary::from_link(&link, settings.kdf)
}

/// A decrypted sanctuary as held by the viewer.
#[derive(Debug, Clone)]
pub struct OpenedSanctuary {
    config: Configuration,
    state: SanctuaryState,
    kdf: KdfParams,
}

impl OpenedSanctuary {
    /// Decrypts the outer payload of an already-parsed link.
    pub fn from_link(link: &SanctuaryLink, kdf: KdfParams) -> LinkResult<Self> {
        let version = SchemaVersion::from_tag(link.payload().v.as_deref())?;
        let master_key = import_key(link.key())?;
        let sealed = EncryptedData {
            ciphertext: link.payload().d.clone(),
            iv: link.payload().iv.clone(),
        };

        let config = version.decrypt(&master_key, &sealed).inspect_err(|e| {
            warn!(version = %version, "outer decryption failed: {e}");
        })?;

        let state = if config.is_passcode_tiered() {
            SanctuaryState::Locked
        } else {
            SanctuaryState::Unlocked
        };
        debug!(version = %version, ?state, "opened sanctuary");

        Ok(Self { config, state, kdf })
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn into_configuration(self) -> Configuration {
        self.config
    }

    pub fn state(&self) -> SanctuaryState {
        self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state == SanctuaryState::Locked
    }

    /// Tries a passcode against the passcode tier.
    ///
    /// On failure the sanctuary stays locked and unchanged; the error does not
    /// say anything about how close the guess was.
    pub fn unlock(&mut self, passcode: &str) -> LinkResult<&Configuration> {
        let tier = self.locked_tier()?;
        let opened = tier.open(passcode, &self.kdf);
        self.finish_unlock(passcode, opened)
    }

    /// [`OpenedSanctuary::unlock`] with the key derivation moved off the
    /// async executor.
    pub async fn unlock_async(&mut self, passcode: &str) -> LinkResult<&Configuration> {
        let tier = self.locked_tier()?;
        let kdf = self.kdf;
        let code = passcode.to_string();
        let opened = tokio::task::spawn_blocking(move || tier.open(&code, &kdf))
            .await
            .map_err(|e| LinkError::Task(e.to_string()))?;
        self.finish_unlock(passcode, opened)
    }

    fn locked_tier(&self) -> LinkResult<LockedTier> {
        if !self.is_locked() {
            return Err(LinkError::NotLocked);
        }
        LockedTier::from_config(&self.config)
    }

    fn finish_unlock(
        &mut self,
        passcode: &str,
        opened: LinkResult<(Vec<Note>, Option<String>)>,
    ) -> LinkResult<&Configuration> {
        let (notes, video) = opened.inspect_err(|_| debug!("passcode rejected"))?;

        self.config.notes = notes;
        self.config.video_url = video;
        self.config.passcode = passcode.to_string();
        self.config.passcode_salt = None;
        self.config.encrypted_notes = None;
        self.config.encrypted_video = None;
        self.state = SanctuaryState::Unlocked;
        info!(notes = self.config.notes.len(), "sanctuary unlocked");

        Ok(&self.config)
    }
}
