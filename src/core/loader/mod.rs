// ─── Version Manifest Loader ───
// Retrieves the raw manifest text. Remote manifests are signed unless the
// config says otherwise; local override files are always unsigned.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::core::config::LauncherConfig;
use crate::core::error::{LauncherError, LauncherResult};

/// Manifest text as delivered, before any verification.
#[derive(Debug, Clone)]
pub struct RawManifest {
    pub data: String,
    pub unsigned: bool,
    /// URL or path the data came from, for logs.
    pub source: String,
}

#[async_trait]
pub trait ManifestLoader: Send + Sync {
    async fn load(&self) -> LauncherResult<RawManifest>;
}

/// Downloads the manifest, refusing bodies over `max_bytes`.
pub struct HttpManifestLoader {
    client: Client,
    url: String,
    signed: bool,
    max_bytes: u64,
}

impl HttpManifestLoader {
    pub fn new(client: Client, url: impl Into<String>, signed: bool, max_bytes: u64) -> Self {
        Self {
            client,
            url: url.into(),
            signed,
            max_bytes,
        }
    }

    fn too_large(&self) -> LauncherError {
        LauncherError::ManifestTooLarge {
            url: self.url.clone(),
            limit: self.max_bytes,
        }
    }
}

#[async_trait]
impl ManifestLoader for HttpManifestLoader {
    async fn load(&self) -> LauncherResult<RawManifest> {
        info!("Fetching version manifest from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        if response.content_length().is_some_and(|len| len > self.max_bytes) {
            return Err(self.too_large());
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            if (body.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(self.too_large());
            }
            body.extend_from_slice(&chunk);
        }

        let data = String::from_utf8(body)
            .map_err(|e| LauncherError::Other(format!("Manifest is not valid UTF-8: {e}")))?;
        debug!("Downloaded {} bytes of version data", data.len());

        Ok(RawManifest {
            data,
            unsigned: !self.signed,
            source: self.url.clone(),
        })
    }
}

/// Reads a local manifest. Used for development builds, never signed.
pub struct FileManifestLoader {
    path: PathBuf,
}

impl FileManifestLoader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ManifestLoader for FileManifestLoader {
    async fn load(&self) -> LauncherResult<RawManifest> {
        info!("Loading local version manifest {:?}", self.path);
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| LauncherError::Io {
                path: self.path.clone(),
                source,
            })?;

        Ok(RawManifest {
            data,
            unsigned: true,
            source: self.path.display().to_string(),
        })
    }
}

/// Pick the loader the config asks for.
pub fn loader_from_config(config: &LauncherConfig, client: Client) -> Arc<dyn ManifestLoader> {
    match &config.local_manifest {
        Some(path) => Arc::new(FileManifestLoader::new(path.clone())),
        None => Arc::new(HttpManifestLoader::new(
            client,
            config.manifest_url.clone(),
            config.manifest_signed,
            config.max_manifest_bytes,
        )),
    }
}

pub type Callback<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// Run `loader` in the background and hand its result to `callback` exactly once.
pub fn load_version_data(
    loader: Arc<dyn ManifestLoader>,
    callback: Callback<LauncherResult<RawManifest>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let result = loader.load().await;
        callback(result);
    })
}

/// Turn a callback-style start function into a future of its single result.
///
/// A callback that is dropped without being called yields `LoaderDropped`.
pub async fn receive_once<T, F>(start: F) -> LauncherResult<T>
where
    T: Send + 'static,
    F: FnOnce(Callback<T>),
{
    let (tx, rx) = oneshot::channel();
    start(Box::new(move |value| {
        let _ = tx.send(value);
    }));
    rx.await.map_err(|_| LauncherError::LoaderDropped)
}
