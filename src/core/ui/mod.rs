// ─── UI Sink ───
// Everything the startup code wants the user to see goes through `UiSink`.
// The front-end (console, Tauri window, test recorder) decides how.

mod console;
#[cfg(feature = "tauri")]
mod tauri_bridge;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::core::news::NewsContent;
use crate::core::version::VersionInfo;

pub use console::ConsoleUi;
#[cfg(feature = "tauri")]
pub use tauri_bridge::TauriUi;

/// The two news areas on the main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsPanel {
    News,
    DevForum,
}

#[async_trait]
pub trait UiSink: Send + Sync {
    /// Show a blocking error dialog. Resolves once the user dismisses it.
    async fn show_generic_error(&self, message: &str);

    /// Show the "launcher cannot start" dialog, with `details` appended to its body.
    fn show_cannot_start(&self, details: Option<&str>);

    /// Fill the version select control next to the play button.
    fn send_version_info_to_play_button(&self, info: Arc<VersionInfo>);

    /// Apply the remembered version select choice.
    fn select_version(&self, id: Option<&str>);

    fn launcher_update_available(&self, latest: &str, download_url: Option<&str>);

    fn show_news(&self, panel: NewsPanel, content: &NewsContent);
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use tokio::sync::Notify;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum UiEvent {
        GenericError(String),
        GenericErrorDismissed,
        CannotStart(Option<String>),
        PlayButton(Vec<String>),
        Selected(Option<String>),
        LauncherUpdate(String),
        News(NewsPanel, String),
    }

    /// Records every call in order. With `gated()`, generic errors stay open
    /// until `dismiss()` is called.
    #[derive(Default)]
    pub struct RecordingUi {
        events: Mutex<Vec<UiEvent>>,
        gate: Option<Notify>,
    }

    impl RecordingUi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn gated() -> Self {
            Self {
                events: Mutex::default(),
                gate: Some(Notify::new()),
            }
        }

        pub fn dismiss(&self) {
            if let Some(gate) = &self.gate {
                gate.notify_one();
            }
        }

        pub fn events(&self) -> Vec<UiEvent> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: UiEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[async_trait]
    impl UiSink for RecordingUi {
        async fn show_generic_error(&self, message: &str) {
            self.push(UiEvent::GenericError(message.to_string()));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.push(UiEvent::GenericErrorDismissed);
        }

        fn show_cannot_start(&self, details: Option<&str>) {
            self.push(UiEvent::CannotStart(details.map(str::to_string)));
        }

        fn send_version_info_to_play_button(&self, info: Arc<VersionInfo>) {
            let ids = info.versions.iter().map(|v| v.id.clone()).collect();
            self.push(UiEvent::PlayButton(ids));
        }

        fn select_version(&self, id: Option<&str>) {
            self.push(UiEvent::Selected(id.map(str::to_string)));
        }

        fn launcher_update_available(&self, latest: &str, _download_url: Option<&str>) {
            self.push(UiEvent::LauncherUpdate(latest.to_string()));
        }

        fn show_news(&self, panel: NewsPanel, content: &NewsContent) {
            self.push(UiEvent::News(panel, content.summary_line()));
        }
    }
}
