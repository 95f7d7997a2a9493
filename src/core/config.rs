// ─── Launcher Config ───
// Endpoints and paths the startup sequence needs. Defaults are constants,
// `LAUNCHER_*` environment variables override them.

use std::path::PathBuf;

use tracing::warn;

const APP_DIR_NAME: &str = "LauncherBootstrap";
const DEFAULT_MANIFEST_URL: &str = "https://launcher.example.org/version_info.json.asc";
const DEFAULT_NEWS_URL: &str = "https://launcher.example.org/feeds/news.rss";
const DEFAULT_DEVFORUM_URL: &str = "https://forum.example.org/c/dev/posts.rss";
const LAUNCHER_KEY_FILE: &str = "launcher_key.pub";
const DEFAULT_MAX_MANIFEST_BYTES: u64 = 4 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Where the version manifest is downloaded from.
    pub manifest_url: String,
    /// Whether `manifest_url` serves a cleartext-signed manifest.
    pub manifest_signed: bool,
    /// Local unsigned manifest used instead of `manifest_url` (development).
    pub local_manifest: Option<PathBuf>,
    /// Hex-encoded Ed25519 public key the manifest must be signed with.
    pub launcher_key_path: PathBuf,
    pub news_url: String,
    pub devforum_url: String,
    pub data_dir: PathBuf,
    /// Version of the running launcher, compared against the manifest.
    pub launcher_version: String,
    pub max_manifest_bytes: u64,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.into(),
            manifest_signed: true,
            local_manifest: None,
            launcher_key_path: data_dir.join(LAUNCHER_KEY_FILE),
            news_url: DEFAULT_NEWS_URL.into(),
            devforum_url: DEFAULT_DEVFORUM_URL.into(),
            data_dir,
            launcher_version: env!("CARGO_PKG_VERSION").into(),
            max_manifest_bytes: DEFAULT_MAX_MANIFEST_BYTES,
        }
    }
}

impl LauncherConfig {
    /// Defaults with `LAUNCHER_*` environment overrides applied.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("LAUNCHER_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
            config.launcher_key_path = config.data_dir.join(LAUNCHER_KEY_FILE);
        }
        if let Some(url) = lookup("LAUNCHER_MANIFEST_URL") {
            config.manifest_url = url;
        }
        if let Some(raw) = lookup("LAUNCHER_MANIFEST_SIGNED") {
            match parse_flag(&raw) {
                Some(flag) => config.manifest_signed = flag,
                None => warn!("Ignoring LAUNCHER_MANIFEST_SIGNED={raw:?}: expected a boolean"),
            }
        }
        if let Some(path) = lookup("LAUNCHER_LOCAL_MANIFEST") {
            config.local_manifest = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("LAUNCHER_KEY_PATH") {
            config.launcher_key_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("LAUNCHER_NEWS_URL") {
            config.news_url = url;
        }
        if let Some(url) = lookup("LAUNCHER_DEVFORUM_URL") {
            config.devforum_url = url;
        }
        if let Some(raw) = lookup("LAUNCHER_MAX_MANIFEST_BYTES") {
            match raw.trim().parse::<u64>() {
                Ok(limit) if limit > 0 => config.max_manifest_bytes = limit,
                _ => warn!("Ignoring LAUNCHER_MAX_MANIFEST_BYTES={raw:?}"),
            }
        }

        config
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("launcher_settings.json")
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}
