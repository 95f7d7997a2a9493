use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::{NewsPanel, UiSink};
use crate::core::news::NewsContent;
use crate::core::play::PlayButton;
use crate::core::version::VersionInfo;

/// Headless front-end: every dialog becomes a log line.
///
/// There is nobody to dismiss a dialog, so errors resolve immediately.
#[derive(Default)]
pub struct ConsoleUi {
    play_button: Mutex<PlayButton>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the version select / play button.
    pub fn play_button(&self) -> PlayButton {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PlayButton> {
        self.play_button
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UiSink for ConsoleUi {
    async fn show_generic_error(&self, message: &str) {
        error!("{}", message);
    }

    fn show_cannot_start(&self, details: Option<&str>) {
        error!(
            "The launcher cannot start. Make sure it is up to date.{}",
            details.unwrap_or_default()
        );
    }

    fn send_version_info_to_play_button(&self, info: Arc<VersionInfo>) {
        info!("{} versions available to play", info.versions.len());
        self.lock().set_version_info(info);
    }

    fn select_version(&self, id: Option<&str>) {
        self.lock().select(id.map(str::to_string));
    }

    fn launcher_update_available(&self, latest: &str, download_url: Option<&str>) {
        match download_url {
            Some(url) => warn!("Launcher {} is available: {}", latest, url),
            None => warn!("Launcher {} is available", latest),
        }
    }

    fn show_news(&self, panel: NewsPanel, content: &NewsContent) {
        match content {
            NewsContent::Ready(items) => {
                for item in items {
                    info!("[{:?}] {}", panel, item.title);
                }
            }
            other => info!("[{:?}] {}", panel, other.summary_line()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_button_follows_ui_calls() {
        let ui = ConsoleUi::new();
        let info = VersionInfo::from_unsigned(r#"{"versions":[{"id":"1.0"},{"id":"1.2"}]}"#).unwrap();

        ui.select_version(Some("1.0"));
        ui.send_version_info_to_play_button(Arc::new(info));

        let button = ui.play_button();
        assert_eq!(button.play_target().unwrap().id, "1.0");
        assert_eq!(button.available().len(), 2);
    }
}
