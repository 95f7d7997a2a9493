pub mod app_state;
pub mod settings;
pub mod version_store;

pub use app_state::AppState;
pub use settings::{LauncherSettings, SettingsStore};
pub use version_store::VersionInfoStore;
