//! Command implementations. Each returns what `main` prints on stdout.

use anyhow::{Context, Result, anyhow, bail};
use sanctuary_crypto::KdfParams;
use sanctuary_license::{Plan, SigningSecret, sign, verify};
use sanctuary_link::{Configuration, LinkError, LinkSettings, OpenedSanctuary, open, package};
use std::path::Path;
use tracing::{debug, info, warn};

/// Applies command line overrides on top of environment-derived settings.
pub fn resolve_settings(
    base: LinkSettings,
    origin: Option<&str>,
    kdf_iterations: Option<u32>,
) -> Result<LinkSettings> {
    let mut settings = base;
    if let Some(origin) = origin {
        settings = settings.with_origin(origin)?;
    }
    if let Some(iterations) = kdf_iterations {
        settings = settings.with_kdf(KdfParams::new(iterations)?);
    }
    Ok(settings)
}

/// Replaces a link error with the message a viewer would see.
fn for_viewer(err: LinkError) -> anyhow::Error {
    debug!("link error: {err}");
    anyhow!(err.user_message())
}

pub fn cmd_package(config_path: &Path, settings: &LinkSettings) -> Result<String> {
    let raw = std::fs::read_to_string(config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let config: Configuration = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a valid configuration", config_path.display()))?;

    let packaged = package(&config, settings)?;
    if !packaged.is_passcode_tiered() {
        warn!("default passcode in use, notes and video are readable by anyone with the link");
    }
    Ok(packaged.url().to_string())
}

async fn open_link(
    url: &str,
    passcode: Option<&str>,
    settings: &LinkSettings,
) -> Result<OpenedSanctuary> {
    let mut opened = open(url, settings).map_err(for_viewer)?;

    match passcode {
        Some(code) if opened.is_locked() => {
            opened.unlock_async(code).await.map_err(for_viewer)?;
        }
        Some(_) => info!("sanctuary has no passcode tier, ignoring --passcode"),
        None if opened.is_locked() => {
            info!("sanctuary is locked, notes and video omitted (pass --passcode)");
        }
        None => {}
    }
    Ok(opened)
}

pub async fn cmd_open(url: &str, passcode: Option<&str>, settings: &LinkSettings) -> Result<String> {
    let opened = open_link(url, passcode, settings).await?;
    Ok(serde_json::to_string_pretty(opened.configuration())?)
}

/// Lists the uploaded photos and videos a link refers to, one per line.
pub async fn cmd_assets(
    url: &str,
    passcode: Option<&str>,
    settings: &LinkSettings,
) -> Result<String> {
    let opened = open_link(url, passcode, settings).await?;
    let urls = opened.configuration().media_urls();
    if urls.is_empty() {
        bail!("couldn't find any uploaded photos or videos associated with this link");
    }
    Ok(urls.join("\n"))
}

pub fn cmd_sign(plan: Plan, name_a: &str, name_b: &str, secret: &SigningSecret) -> Result<String> {
    Ok(sign(plan, name_a, name_b, secret)?)
}

pub fn cmd_verify(
    plan: Plan,
    name_a: &str,
    name_b: &str,
    signature: &str,
    secret: &SigningSecret,
) -> String {
    verify(plan, name_a, name_b, signature, secret).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG: &str = r#"{
        "plan": "plus",
        "names": { "partner1": "Alex", "partner2": "Sam" },
        "anniversaryDate": "2022-07-28",
        "totalDays": 14,
        "notes": [{ "id": "note14", "day": 14, "content": "Happy Valentine's Day!" }],
        "passcode": "1402"
    }"#;

    fn settings() -> LinkSettings {
        resolve_settings(
            LinkSettings::default(),
            Some("https://sanctuary.example"),
            Some(1_000),
        )
        .unwrap()
    }

    fn config_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn overrides_apply() {
        let settings = settings();
        assert_eq!(settings.origin, "https://sanctuary.example");
        assert_eq!(settings.kdf.iterations, 1_000);
    }

    #[test]
    fn invalid_overrides_fail() {
        assert!(resolve_settings(LinkSettings::default(), Some("nope"), None).is_err());
        assert!(resolve_settings(LinkSettings::default(), None, Some(0)).is_err());
    }

    #[tokio::test]
    async fn package_then_open_with_passcode() {
        let file = config_file(CONFIG);
        let url = cmd_package(file.path(), &settings()).unwrap();
        assert!(url.starts_with("https://sanctuary.example/?d="));

        let locked = cmd_open(&url, None, &settings()).await.unwrap();
        assert!(!locked.contains("Happy Valentine's Day!"));

        let unlocked = cmd_open(&url, Some("1402"), &settings()).await.unwrap();
        let config: Configuration = serde_json::from_str(&unlocked).unwrap();
        assert_eq!(config.notes[0].content, "Happy Valentine's Day!");
    }

    #[tokio::test]
    async fn wrong_passcode_shows_viewer_message() {
        let file = config_file(CONFIG);
        let url = cmd_package(file.path(), &settings()).unwrap();
        let err = cmd_open(&url, Some("0000"), &settings()).await.unwrap_err();
        assert_eq!(err.to_string(), "incorrect code, try again");
    }

    #[tokio::test]
    async fn malformed_link_shows_viewer_message() {
        let err = cmd_open("https://sanctuary.example/?d=abc", None, &settings())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "this doesn't look like a valid sanctuary link");
    }

    #[test]
    fn package_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = cmd_package(&dir.path().join("missing.json"), &settings()).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }

    #[test]
    fn package_rejects_invalid_configuration() {
        let file = config_file(&CONFIG.replace("\"1402\"", "\"14\""));
        assert!(cmd_package(file.path(), &settings()).is_err());
    }

    #[tokio::test]
    async fn assets_lists_media_and_video_after_unlock() {
        let with_media = CONFIG.replace(
            "\"passcode\": \"1402\"",
            r#""passcode": "1402",
            "backgroundUrl": "https://img.example/bg.jpg",
            "videoUrl": "https://video.example/us.mp4""#,
        );
        let file = config_file(&with_media);
        let url = cmd_package(file.path(), &settings()).unwrap();

        let locked = cmd_assets(&url, None, &settings()).await.unwrap();
        assert_eq!(locked, "https://img.example/bg.jpg");

        let unlocked = cmd_assets(&url, Some("1402"), &settings()).await.unwrap();
        assert_eq!(
            unlocked.lines().collect::<Vec<_>>(),
            vec!["https://img.example/bg.jpg", "https://video.example/us.mp4"]
        );
    }

    #[tokio::test]
    async fn assets_reports_link_without_media() {
        let file = config_file(CONFIG);
        let url = cmd_package(file.path(), &settings()).unwrap();
        let err = cmd_assets(&url, Some("1402"), &settings()).await.unwrap_err();
        assert!(err.to_string().contains("couldn't find any uploaded photos or videos"));
    }

    #[test]
    fn sign_and_verify_agree() {
        let secret = SigningSecret::new("server-secret");
        let signature = cmd_sign(Plan::Infinite, "Alex", "Sam", &secret).unwrap();
        assert_eq!(cmd_verify(Plan::Infinite, "Alex", "Sam", &signature, &secret), "true");
        assert_eq!(cmd_verify(Plan::Plus, "Alex", "Sam", &signature, &secret), "false");
    }
}
