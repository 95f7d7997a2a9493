use std::path::PathBuf;
use thiserror::Error;

use crate::core::signing::EnvelopeError;

/// Central error type for the launcher startup code.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Manifest from {url} exceeds {limit} bytes")]
    ManifestTooLarge { url: String, limit: u64 },

    #[error("Version data loader finished without delivering data")]
    LoaderDropped,

    // ── Signature ───────────────────────────────────────
    #[error("missing launcher key")]
    MissingLauncherKey,

    #[error("Invalid launcher key: {0}")]
    InvalidKey(#[from] ed25519_dalek::SignatureError),

    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Malformed signed message: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("Error verifying signature validity. Did the download get corrupted?")]
    SignatureInvalid,

    // ── Launcher version ────────────────────────────────
    #[error("Launcher {current} is too old, version {required} or newer is required")]
    LauncherOutdated { current: String, required: String },

    // ── Parsing ─────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::DeError),

    // ── Generic ─────────────────────────────────────────
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

// Front-ends receive errors as plain strings.
impl serde::Serialize for LauncherError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
