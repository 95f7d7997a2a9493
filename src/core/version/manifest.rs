// ─── Version Manifest ───
// Parsed form of the launcher's version_info document.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::ordering::{compare_versions, is_prerelease};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::signing::VerifiedPayload;

/// Top-level version manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub versions: Vec<VersionEntry>,
    /// Explicit recommendation; overrides the "highest stable" rule.
    #[serde(default)]
    pub latest_version: Option<String>,
    #[serde(default)]
    pub launcher: Option<LauncherRequirements>,
}

/// A single playable version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub id: String,
    #[serde(default)]
    pub release_num: Option<u32>,
    #[serde(default = "default_stable")]
    pub stable: bool,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub downloads: Vec<PlatformDownload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformDownload {
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub sha256: Option<String>,
}

/// What the manifest says about the launcher itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LauncherRequirements {
    /// Newest launcher release.
    #[serde(default)]
    pub latest: Option<String>,
    /// Oldest launcher allowed to use this manifest.
    #[serde(default)]
    pub minimum: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
}

fn default_stable() -> bool {
    true
}

impl VersionInfo {
    /// Parse a manifest that was served unsigned.
    pub fn from_unsigned(data: &str) -> LauncherResult<Self> {
        Self::parse_data(data)
    }

    /// Parse the text of a manifest whose signature has been verified.
    pub fn from_verified(payload: &VerifiedPayload) -> LauncherResult<Self> {
        Self::parse_data(payload.data())
    }

    fn parse_data(data: &str) -> LauncherResult<Self> {
        let info: VersionInfo = serde_json::from_str(data)?;

        let mut seen = HashSet::new();
        for entry in &info.versions {
            if entry.id.trim().is_empty() {
                return Err(LauncherError::Other("Version entry with empty id".into()));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(LauncherError::Other(format!(
                    "Duplicate version id in manifest: {}",
                    entry.id
                )));
            }
        }

        info!("Loaded {} versions from manifest", info.versions.len());
        Ok(info)
    }

    /// Find a specific version entry by ID (e.g. "1.2.0").
    pub fn find_version(&self, id: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Entries that are neither flagged unstable nor tagged pre-release.
    pub fn stable_versions(&self) -> Vec<&VersionEntry> {
        self.versions.iter().filter(|v| v.is_stable()).collect()
    }

    /// The version offered as the default play target.
    ///
    /// An explicit `latestVersion` that names a listed entry wins. Otherwise
    /// the highest stable entry, and failing that the highest entry at all.
    pub fn get_recommended_version(&self) -> Option<&VersionEntry> {
        if let Some(entry) = self
            .latest_version
            .as_deref()
            .and_then(|id| self.find_version(id))
        {
            return Some(entry);
        }

        highest(self.versions.iter().filter(|v| v.is_stable()))
            .or_else(|| highest(self.versions.iter()))
    }
}

fn highest<'a>(entries: impl Iterator<Item = &'a VersionEntry>) -> Option<&'a VersionEntry> {
    entries.max_by(|a, b| compare_versions(&a.id, &b.id))
}

impl VersionEntry {
    pub fn is_stable(&self) -> bool {
        self.stable && !is_prerelease(&self.id)
    }

    /// Download for the given platform name (e.g. "linux", "windows").
    pub fn download_for(&self, platform: &str) -> Option<&PlatformDownload> {
        self.downloads
            .iter()
            .find(|d| d.platform.eq_ignore_ascii_case(platform))
    }
}
