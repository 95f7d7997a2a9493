use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::version::compare_versions;

/// User preferences persisted between launches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherSettings {
    pub fetch_news_from_web: bool,
    /// Version the user picked in the version select control.
    pub selected_version: Option<String>,
    /// Most recent recommended version this launcher has seen.
    pub latest_seen_version: Option<String>,
    /// Route panics through the log instead of the default hook.
    pub catch_errors: bool,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            fetch_news_from_web: true,
            selected_version: None,
            latest_seen_version: None,
            catch_errors: true,
        }
    }
}

/// Settings file plus the in-memory copy everyone reads from.
///
/// Writes are fire-and-forget: a failed save is logged, never propagated.
pub struct SettingsStore {
    path: PathBuf,
    settings: Mutex<LauncherSettings>,
}

impl SettingsStore {
    /// Load settings synchronously; a missing or unreadable file yields defaults.
    pub fn load(path: PathBuf) -> Self {
        let settings = load_settings_from_disk(&path).unwrap_or_default();
        Self {
            path,
            settings: Mutex::new(settings),
        }
    }

    pub fn snapshot(&self) -> LauncherSettings {
        self.lock().clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&*self.lock())?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
    }

    /// The remembered version select choice.
    pub fn load_selected_version(&self) -> Option<String> {
        let selected = self.lock().selected_version.clone();
        debug!("Remembered selected version: {:?}", selected);
        selected
    }

    pub fn set_selected_version(&self, id: Option<String>) {
        {
            let mut settings = self.lock();
            if settings.selected_version == id {
                return;
            }
            settings.selected_version = id;
        }
        self.persist();
    }

    /// Record `id` as the latest seen recommended version.
    ///
    /// Returns true when `id` is newer than the previously seen one, i.e. the
    /// user has not been told about it yet.
    pub fn report_latest_version(&self, id: &str) -> bool {
        let newer = {
            let mut settings = self.lock();
            let newer = match settings.latest_seen_version.as_deref() {
                None => true,
                Some(previous) if previous == id => return false,
                Some(previous) => compare_versions(id, previous).is_gt(),
            };
            settings.latest_seen_version = Some(id.to_string());
            newer
        };

        if newer {
            info!("New recommended version seen: {}", id);
        }
        self.persist();
        newer
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!("Failed to save settings to {:?}: {}", self.path, e);
        }
    }

    fn lock(&self) -> MutexGuard<'_, LauncherSettings> {
        self.settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn load_settings_from_disk(path: &Path) -> Option<LauncherSettings> {
    let raw = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&raw) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("Ignoring unreadable settings file {:?}: {}", path, e);
            None
        }
    }
}
