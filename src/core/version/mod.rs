pub mod launcher_check;
pub mod manifest;
pub mod ordering;

pub use launcher_check::{LauncherStatus, LauncherVersionCheck, ManifestLauncherCheck};
pub use manifest::{LauncherRequirements, PlatformDownload, VersionEntry, VersionInfo};
pub use ordering::{compare_versions, is_prerelease, parse_version};
