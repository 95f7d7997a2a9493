use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use ed25519_dalek::VerifyingKey;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::envelope::EnvelopeError;
use crate::core::error::{LauncherError, LauncherResult};

/// 64-bit key fingerprint: the last 8 bytes of `SHA-256(public key)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyId([u8; 8]);

impl KeyId {
    pub fn of(key: &VerifyingKey) -> Self {
        let digest = Sha256::digest(key.as_bytes());
        let mut id = [0u8; 8];
        id.copy_from_slice(&digest[digest.len() - 8..]);
        Self(id)
    }

    pub fn from_hex(value: &str) -> Result<Self, EnvelopeError> {
        let bytes = hex::decode(value.trim())?;
        let id: [u8; 8] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| EnvelopeError::InvalidKeyIdLength(b.len()))?;
        Ok(Self(id))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The key version manifests must be signed with.
#[derive(Debug, Clone)]
pub struct LauncherPublicKey {
    key: VerifyingKey,
    key_id: KeyId,
}

impl LauncherPublicKey {
    pub fn new(key: VerifyingKey) -> Self {
        Self {
            key_id: KeyId::of(&key),
            key,
        }
    }

    /// Decode a hex-encoded 32-byte Ed25519 public key.
    pub fn from_hex(value: &str) -> LauncherResult<Self> {
        let bytes = hex::decode(value.trim())?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            LauncherError::Other(format!(
                "launcher key must be 32 bytes, got {}",
                b.len()
            ))
        })?;
        Ok(Self::new(VerifyingKey::from_bytes(&bytes)?))
    }

    pub fn key_id(&self) -> KeyId {
        self.key_id
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.key
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.key.as_bytes())
    }
}

/// Source of the launcher's signing key. `Ok(None)` means no key is available,
/// which callers must treat as a failure, never as "skip verification".
#[async_trait]
pub trait LauncherKeyProvider: Send + Sync {
    async fn launcher_key(&self) -> LauncherResult<Option<LauncherPublicKey>>;
}

/// Reads a hex-encoded key shipped next to the launcher.
pub struct FileKeyProvider {
    path: PathBuf,
}

impl FileKeyProvider {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl LauncherKeyProvider for FileKeyProvider {
    async fn launcher_key(&self) -> LauncherResult<Option<LauncherPublicKey>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Launcher key not found at {:?}", self.path);
                return Ok(None);
            }
            Err(source) => {
                return Err(LauncherError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if raw.trim().is_empty() {
            warn!("Launcher key file {:?} is empty", self.path);
            return Ok(None);
        }

        let key = LauncherPublicKey::from_hex(&raw)?;
        debug!("Loaded launcher key {} from {:?}", key.key_id(), self.path);
        Ok(Some(key))
    }
}

/// A key known at build time, or deliberately absent.
pub struct StaticKeyProvider(Option<LauncherPublicKey>);

impl StaticKeyProvider {
    pub fn new(key: Option<LauncherPublicKey>) -> Self {
        Self(key)
    }
}

#[async_trait]
impl LauncherKeyProvider for StaticKeyProvider {
    async fn launcher_key(&self) -> LauncherResult<Option<LauncherPublicKey>> {
        Ok(self.0.clone())
    }
}
