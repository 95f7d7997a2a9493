use std::cmp::Ordering;

use async_trait::async_trait;
use tracing::{info, warn};

use super::manifest::VersionInfo;
use super::ordering::compare_versions;
use crate::core::error::{LauncherError, LauncherResult};

/// Result of comparing the running launcher with the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherStatus {
    UpToDate,
    /// A newer launcher exists but this one may keep running.
    UpdateAvailable {
        latest: String,
        download_url: Option<String>,
    },
}

/// Self-update gate run before a manifest is used.
///
/// Returns `LauncherError::LauncherOutdated` when the launcher must be
/// updated before it can continue.
#[async_trait]
pub trait LauncherVersionCheck: Send + Sync {
    async fn check(&self, info: &VersionInfo) -> LauncherResult<LauncherStatus>;
}

/// Compares a fixed launcher version with the manifest's `launcher` section.
pub struct ManifestLauncherCheck {
    current: String,
}

impl ManifestLauncherCheck {
    pub fn new(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }
}

#[async_trait]
impl LauncherVersionCheck for ManifestLauncherCheck {
    async fn check(&self, info: &VersionInfo) -> LauncherResult<LauncherStatus> {
        let Some(launcher) = &info.launcher else {
            return Ok(LauncherStatus::UpToDate);
        };

        if let Some(minimum) = &launcher.minimum {
            if compare_versions(&self.current, minimum) == Ordering::Less {
                warn!(
                    "Launcher {} is below the required minimum {}",
                    self.current, minimum
                );
                return Err(LauncherError::LauncherOutdated {
                    current: self.current.clone(),
                    required: minimum.clone(),
                });
            }
        }

        match &launcher.latest {
            Some(latest) if compare_versions(&self.current, latest) == Ordering::Less => {
                info!("Launcher update available: {} -> {}", self.current, latest);
                Ok(LauncherStatus::UpdateAvailable {
                    latest: latest.clone(),
                    download_url: launcher.download_url.clone(),
                })
            }
            _ => Ok(LauncherStatus::UpToDate),
        }
    }
}
