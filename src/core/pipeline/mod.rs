// ─── Manifest Pipeline ───
// fetch → (verify) → parse → launcher check → UI. Each stage is awaited in
// order and the first failure ends the run in the "cannot start" dialog.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::loader::{load_version_data, receive_once, ManifestLoader, RawManifest};
use crate::core::signing::{verify, CleartextMessage, KeyId, LauncherKeyProvider, VerifiedPayload};
use crate::core::state::{SettingsStore, VersionInfoStore};
use crate::core::ui::UiSink;
use crate::core::version::{LauncherStatus, LauncherVersionCheck, VersionInfo};

pub const SIGNATURE_INVALID_MESSAGE: &str =
    "Error verifying signature validity. Did the download get corrupted?";

/// A manifest accepted by the pipeline.
#[derive(Debug, Clone)]
pub struct AcquiredVersionInfo {
    pub info: Arc<VersionInfo>,
    /// Key that signed the manifest; `None` for unsigned manifests.
    pub signer: Option<KeyId>,
}

#[derive(Debug)]
pub enum PipelineOutcome {
    Ready(AcquiredVersionInfo),
    Failed(LauncherError),
}

impl PipelineOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, PipelineOutcome::Ready(_))
    }
}

pub struct ManifestPipeline {
    keys: Arc<dyn LauncherKeyProvider>,
    launcher_check: Arc<dyn LauncherVersionCheck>,
    settings: Arc<SettingsStore>,
    store: VersionInfoStore,
    ui: Arc<dyn UiSink>,
}

impl ManifestPipeline {
    pub fn new(
        keys: Arc<dyn LauncherKeyProvider>,
        launcher_check: Arc<dyn LauncherVersionCheck>,
        settings: Arc<SettingsStore>,
        store: VersionInfoStore,
        ui: Arc<dyn UiSink>,
    ) -> Self {
        Self {
            keys,
            launcher_check,
            settings,
            store,
            ui,
        }
    }

    /// Load version data once through `loader` and process it.
    pub async fn run(&self, loader: Arc<dyn ManifestLoader>) -> PipelineOutcome {
        let raw = receive_once(|callback| {
            load_version_data(loader, callback);
        })
        .await
        .and_then(|result| result);

        self.on_version_data_received(raw).await
    }

    /// Entry point for delivered version data. Never fails: errors end up
    /// in the cannot-start dialog and in the returned outcome.
    pub async fn on_version_data_received(
        &self,
        raw: LauncherResult<RawManifest>,
    ) -> PipelineOutcome {
        let result = async {
            let raw = raw?;
            let acquired = self.acquire_version_info(&raw).await?;
            self.reconcile(Arc::clone(&acquired.info)).await?;
            self.store.replace(Arc::clone(&acquired.info)).await;
            Ok::<_, LauncherError>(acquired)
        }
        .await;

        match result {
            Ok(acquired) => PipelineOutcome::Ready(acquired),
            Err(err) => {
                error!("Version data could not be used: {}", err);
                let text = err.to_string();
                let details = (!text.is_empty()).then(|| format!(" Error message: {text}"));
                self.ui.show_cannot_start(details.as_deref());
                PipelineOutcome::Failed(err)
            }
        }
    }

    /// Verify (unless unsigned) and parse `raw`.
    ///
    /// Nothing is published here; the store only sees manifests that also
    /// passed `reconcile`.
    pub async fn acquire_version_info(
        &self,
        raw: &RawManifest,
    ) -> LauncherResult<AcquiredVersionInfo> {
        let (info, signer) = if raw.unsigned {
            debug!("Using unsigned version data from {}", raw.source);
            (VersionInfo::from_unsigned(&raw.data)?, None)
        } else {
            let payload = self.verify_signed(&raw.data).await?;
            (VersionInfo::from_verified(&payload)?, Some(payload.signer()))
        };

        Ok(AcquiredVersionInfo {
            info: Arc::new(info),
            signer,
        })
    }

    async fn verify_signed(&self, data: &str) -> LauncherResult<VerifiedPayload> {
        let key = self
            .keys
            .launcher_key()
            .await?
            .ok_or(LauncherError::MissingLauncherKey)?;

        let message = CleartextMessage::parse(data)?;

        match verify(message, &key).into_verified() {
            Some(payload) => {
                info!("Version data signed by key id {}", payload.signer());
                Ok(payload)
            }
            None => {
                error!("Version data signature is not valid for key {}", key.key_id());
                self.ui.show_generic_error(SIGNATURE_INVALID_MESSAGE).await;
                Err(LauncherError::SignatureInvalid)
            }
        }
    }

    /// Check the launcher against `info` and push `info` to the UI.
    pub async fn reconcile(&self, info: Arc<VersionInfo>) -> LauncherResult<()> {
        if let LauncherStatus::UpdateAvailable {
            latest,
            download_url,
        } = self.launcher_check.check(&info).await?
        {
            self.ui
                .launcher_update_available(&latest, download_url.as_deref());
        }

        let selected = match self.settings.load_selected_version() {
            Some(id) if info.find_version(&id).is_none() => {
                warn!("Remembered version {} is no longer offered", id);
                None
            }
            selected => selected,
        };
        self.ui.select_version(selected.as_deref());

        if let Some(latest) = info.get_recommended_version() {
            self.settings.report_latest_version(&latest.id);
        }

        self.ui.send_version_info_to_play_button(info);
        Ok(())
    }
}
