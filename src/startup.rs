use std::sync::Arc;

use tracing::{info, warn};

use crate::core::compat::{check_if_compatible, perform_compatibility_check, CompatibilityReport};
use crate::core::config::LauncherConfig;
use crate::core::error::LauncherResult;
use crate::core::loader::{loader_from_config, ManifestLoader};
use crate::core::news::load_news;
use crate::core::pipeline::{ManifestPipeline, PipelineOutcome};
use crate::core::play::{play_pressed, PlayButton, PlayRequest};
use crate::core::signing::FileKeyProvider;
use crate::core::state::AppState;
use crate::core::ui::UiSink;
use crate::core::version::ManifestLauncherCheck;

/// What happened during startup.
#[derive(Debug)]
pub struct StartupReport {
    /// `None` when the system check itself could not run.
    pub compatibility: Option<CompatibilityReport>,
    pub manifest: PipelineOutcome,
}

/// Wires config, settings and the UI together and runs the startup sequence.
pub struct Launcher {
    state: AppState,
    ui: Arc<dyn UiSink>,
}

impl Launcher {
    pub fn new(config: LauncherConfig, ui: Arc<dyn UiSink>) -> LauncherResult<Self> {
        let state = AppState::new(config)?;
        Ok(Self { state, ui })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn pipeline(&self) -> ManifestPipeline {
        ManifestPipeline::new(
            Arc::new(FileKeyProvider::new(
                self.state.config.launcher_key_path.clone(),
            )),
            Arc::new(ManifestLauncherCheck::new(
                self.state.config.launcher_version.clone(),
            )),
            Arc::clone(&self.state.settings),
            self.state.versions.clone(),
            Arc::clone(&self.ui),
        )
    }

    pub fn manifest_loader(&self) -> Arc<dyn ManifestLoader> {
        loader_from_config(&self.state.config, self.state.http_client.clone())
    }

    /// Settings → panic hook → system check → manifest pipeline alongside news.
    pub async fn start(&self) -> StartupReport {
        let settings = self.state.settings.snapshot();
        if settings.catch_errors {
            crate::install_panic_hook();
        }

        info!(
            "Launcher {} starting, data dir {:?}",
            self.state.config.launcher_version, self.state.config.data_dir
        );

        let compatibility = match check_if_compatible().await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("Skipping compatibility check: {}", e);
                None
            }
        };

        let pipeline = self.pipeline();
        let config = &self.state.config;
        let (manifest, ()) = tokio::join!(
            pipeline.run(self.manifest_loader()),
            load_news(
                self.ui.as_ref(),
                &self.state.http_client,
                settings.fetch_news_from_web,
                &config.news_url,
                &config.devforum_url,
            )
        );

        StartupReport {
            compatibility,
            manifest,
        }
    }

    /// Play pressed: warn about compatibility problems, then resolve the target.
    pub async fn play(
        &self,
        button: &PlayButton,
        compatibility: Option<&CompatibilityReport>,
    ) -> LauncherResult<PlayRequest> {
        let request = perform_compatibility_check(self.ui.as_ref(), compatibility, || async {
            play_pressed(button)
        })
        .await?;

        if let Some(selected) = button.selected() {
            if selected == request.version {
                self.state
                    .settings
                    .set_selected_version(Some(selected.to_string()));
            }
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use ed25519_dalek::SigningKey;

    use super::*;
    use crate::core::signing::{sign_cleartext, LauncherPublicKey};
    use crate::core::ui::testing::{RecordingUi, UiEvent};
    use crate::core::ui::NewsPanel;

    fn config(dir: &Path) -> LauncherConfig {
        LauncherConfig {
            data_dir: dir.to_path_buf(),
            launcher_key_path: dir.join("launcher_key.pub"),
            news_url: "http://127.0.0.1:1/news.rss".into(),
            devforum_url: "http://127.0.0.1:1/dev.rss".into(),
            launcher_version: "1.0.0".into(),
            ..LauncherConfig::default()
        }
    }

    #[tokio::test]
    async fn starts_from_local_manifest_with_news_disabled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("launcher_settings.json"),
            r#"{"fetch_news_from_web": false, "catch_errors": false}"#,
        )
        .unwrap();
        let manifest = dir.path().join("version_info.json");
        std::fs::write(&manifest, r#"{"versions":[{"id":"1.0"},{"id":"1.2"}]}"#).unwrap();

        let ui = Arc::new(RecordingUi::new());
        let launcher = Launcher::new(
            LauncherConfig {
                local_manifest: Some(manifest),
                ..config(dir.path())
            },
            ui.clone(),
        )
        .unwrap();

        let report = launcher.start().await;
        assert!(report.manifest.is_ready());

        let events = ui.events();
        assert!(events.contains(&UiEvent::News(NewsPanel::News, "Web content is disabled.".into())));
        assert!(events.contains(&UiEvent::PlayButton(vec!["1.0".into(), "1.2".into()])));
        assert_eq!(
            launcher.state().versions.current().await.unwrap().versions.len(),
            2
        );
    }

    #[tokio::test]
    async fn signed_manifest_without_key_file_cannot_start() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("launcher_settings.json"),
            r#"{"fetch_news_from_web": false, "catch_errors": false}"#,
        )
        .unwrap();

        let ui = Arc::new(RecordingUi::new());
        let launcher = Launcher::new(config(dir.path()), ui.clone()).unwrap();

        let armored = sign_cleartext(r#"{"versions":[]}"#, &[&SigningKey::from_bytes(&[5u8; 32])]);
        let outcome = launcher
            .pipeline()
            .on_version_data_received(Ok(crate::core::loader::RawManifest {
                data: armored,
                unsigned: false,
                source: "test".into(),
            }))
            .await;

        assert!(!outcome.is_ready());
        assert!(ui.events().contains(&UiEvent::CannotStart(Some(
            " Error message: missing launcher key".into()
        ))));
    }

    #[tokio::test]
    async fn key_file_in_data_dir_verifies_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let signing = SigningKey::from_bytes(&[5u8; 32]);
        std::fs::write(
            dir.path().join("launcher_key.pub"),
            LauncherPublicKey::new(signing.verifying_key()).to_hex(),
        )
        .unwrap();

        let ui = Arc::new(RecordingUi::new());
        let launcher = Launcher::new(config(dir.path()), ui.clone()).unwrap();
        let outcome = launcher
            .pipeline()
            .on_version_data_received(Ok(crate::core::loader::RawManifest {
                data: sign_cleartext(r#"{"versions":[{"id":"2.0"}]}"#, &[&signing]),
                unsigned: false,
                source: "test".into(),
            }))
            .await;

        assert!(outcome.is_ready());
        assert_eq!(
            launcher.state().settings.snapshot().latest_seen_version.as_deref(),
            Some("2.0")
        );
    }

    #[tokio::test]
    async fn play_remembers_the_chosen_version() {
        let dir = tempfile::tempdir().unwrap();
        let ui = Arc::new(RecordingUi::new());
        let launcher = Launcher::new(config(dir.path()), ui.clone()).unwrap();

        let info = crate::core::version::VersionInfo::from_unsigned(
            r#"{"versions":[
                {"id":"1.0","downloads":[{"platform":"linux","url":"u"},{"platform":"windows","url":"u"},{"platform":"macos","url":"u"}]},
                {"id":"1.2"}
            ]}"#,
        )
        .unwrap();
        let mut button = PlayButton::default();
        button.set_version_info(Arc::new(info));
        button.select(Some("1.0".into()));

        let request = launcher.play(&button, None).await.unwrap();
        assert_eq!(request.version, "1.0");
        assert_eq!(
            launcher.state().settings.load_selected_version().as_deref(),
            Some("1.0")
        );
    }
}
