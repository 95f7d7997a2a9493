use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tauri::{AppHandle, Emitter, Listener};
use tokio::sync::oneshot;
use tracing::warn;

use super::{NewsPanel, UiSink};
use crate::core::news::NewsContent;
use crate::core::version::VersionInfo;

const GENERIC_ERROR_DISMISSED: &str = "generic-error-dismissed";

#[derive(Clone, Serialize)]
struct CannotStartPayload<'a> {
    details: Option<&'a str>,
}

#[derive(Clone, Serialize)]
struct LauncherUpdatePayload<'a> {
    latest: &'a str,
    download_url: Option<&'a str>,
}

#[derive(Clone, Serialize)]
struct NewsPayload<'a> {
    panel: NewsPanel,
    content: &'a NewsContent,
}

/// Forwards UI calls to a Tauri web front-end as events.
pub struct TauriUi {
    handle: AppHandle,
}

impl TauriUi {
    pub fn new(handle: AppHandle) -> Self {
        Self { handle }
    }

    fn emit<S: Serialize + Clone>(&self, event: &str, payload: S) {
        if let Err(e) = self.handle.emit(event, payload) {
            warn!("Failed to emit {}: {}", event, e);
        }
    }
}

#[async_trait]
impl UiSink for TauriUi {
    async fn show_generic_error(&self, message: &str) {
        let (tx, rx) = oneshot::channel();
        self.handle.once(GENERIC_ERROR_DISMISSED, move |_| {
            let _ = tx.send(());
        });
        self.emit("generic-error", message);
        // A closed window drops the listener; treat that as dismissed
        let _ = rx.await;
    }

    fn show_cannot_start(&self, details: Option<&str>) {
        self.emit("cannot-start", CannotStartPayload { details });
    }

    fn send_version_info_to_play_button(&self, info: Arc<VersionInfo>) {
        self.emit("version-info", &*info);
    }

    fn select_version(&self, id: Option<&str>) {
        self.emit("selected-version", id);
    }

    fn launcher_update_available(&self, latest: &str, download_url: Option<&str>) {
        self.emit(
            "launcher-update",
            LauncherUpdatePayload {
                latest,
                download_url,
            },
        );
    }

    fn show_news(&self, panel: NewsPanel, content: &NewsContent) {
        self.emit("news", NewsPayload { panel, content });
    }
}
