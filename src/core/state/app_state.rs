use std::sync::Arc;

use reqwest::Client;

use super::settings::SettingsStore;
use super::version_store::VersionInfoStore;
use crate::core::config::LauncherConfig;
use crate::core::error::LauncherResult;
use crate::core::http::build_http_client;

/// Everything the startup sequence shares between its steps.
pub struct AppState {
    pub config: LauncherConfig,
    pub settings: Arc<SettingsStore>,
    pub versions: VersionInfoStore,
    pub http_client: Client,
}

impl AppState {
    /// Build state from config. Settings are read synchronously here.
    pub fn new(config: LauncherConfig) -> LauncherResult<Self> {
        let settings = Arc::new(SettingsStore::load(config.settings_path()));
        let http_client = build_http_client()?;

        Ok(Self {
            config,
            settings,
            versions: VersionInfoStore::new(),
            http_client,
        })
    }
}
