use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::version::{VersionEntry, VersionInfo};

/// State behind the version select control and the play button.
#[derive(Debug, Clone, Default)]
pub struct PlayButton {
    info: Option<Arc<VersionInfo>>,
    selected: Option<String>,
}

impl PlayButton {
    pub fn set_version_info(&mut self, info: Arc<VersionInfo>) {
        self.info = Some(info);
    }

    pub fn select(&mut self, id: Option<String>) {
        self.selected = id;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn available(&self) -> &[VersionEntry] {
        self.info.as_deref().map(|i| i.versions.as_slice()).unwrap_or(&[])
    }

    /// The user's choice while the manifest still lists it, else the recommendation.
    pub fn play_target(&self) -> Option<&VersionEntry> {
        let info = self.info.as_deref()?;
        self.selected
            .as_deref()
            .and_then(|id| info.find_version(id))
            .or_else(|| info.get_recommended_version())
    }
}

/// What the game downloader/launcher needs once play is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayRequest {
    pub version: String,
    pub platform: String,
    pub url: String,
    pub sha256: Option<String>,
}

/// Resolve the play target for this platform.
pub fn play_pressed(button: &PlayButton) -> LauncherResult<PlayRequest> {
    play_request_for(button, std::env::consts::OS)
}

fn play_request_for(button: &PlayButton, platform: &str) -> LauncherResult<PlayRequest> {
    let entry = button
        .play_target()
        .ok_or_else(|| LauncherError::Other("No version available to play".into()))?;

    let download = entry.download_for(platform).ok_or_else(|| {
        LauncherError::Other(format!(
            "Version {} has no download for {}",
            entry.id, platform
        ))
    })?;

    info!("Play pressed: {} ({})", entry.id, platform);
    Ok(PlayRequest {
        version: entry.id.clone(),
        platform: download.platform.clone(),
        url: download.url.clone(),
        sha256: download.sha256.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(selected: Option<&str>) -> PlayButton {
        let info = VersionInfo::from_unsigned(
            r#"{"versions":[
                {"id":"1.0","downloads":[{"platform":"linux","url":"https://example.com/1.0-linux.7z"}]},
                {"id":"1.2","downloads":[
                    {"platform":"linux","url":"https://example.com/1.2-linux.7z","sha256":"ab12"},
                    {"platform":"windows","url":"https://example.com/1.2-win.7z"}
                ]}
            ]}"#,
        )
        .unwrap();
        let mut button = PlayButton::default();
        button.set_version_info(Arc::new(info));
        button.select(selected.map(str::to_string));
        button
    }

    #[test]
    fn empty_button_has_no_target() {
        assert!(PlayButton::default().play_target().is_none());
        assert!(PlayButton::default().available().is_empty());
    }

    #[test]
    fn recommended_is_default_target() {
        assert_eq!(button(None).play_target().unwrap().id, "1.2");
    }

    #[test]
    fn selection_overrides_recommendation() {
        assert_eq!(button(Some("1.0")).play_target().unwrap().id, "1.0");
    }

    #[test]
    fn stale_selection_falls_back() {
        assert_eq!(button(Some("0.9")).play_target().unwrap().id, "1.2");
    }

    #[test]
    fn request_uses_platform_download() {
        let request = play_request_for(&button(None), "linux").unwrap();
        assert_eq!(request.url, "https://example.com/1.2-linux.7z");
        assert_eq!(request.sha256.as_deref(), Some("ab12"));
    }

    #[test]
    fn missing_platform_is_an_error() {
        let err = play_request_for(&button(Some("1.0")), "windows").unwrap_err();
        assert!(err.to_string().contains("no download for windows"));
    }

    #[test]
    fn nothing_to_play_is_an_error() {
        assert!(play_pressed(&PlayButton::default()).is_err());
    }
}
