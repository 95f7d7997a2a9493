use std::process::ExitCode;
use std::sync::Arc;

use launcher_bootstrap::core::ui::ConsoleUi;
use launcher_bootstrap::{init_tracing, Launcher, LauncherConfig, PipelineOutcome};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    tracing::info!("Launcher bootstrap starting...");

    let play = std::env::args().skip(1).any(|arg| arg == "play");

    let ui = Arc::new(ConsoleUi::new());
    let launcher = match Launcher::new(LauncherConfig::from_env(), ui.clone()) {
        Ok(launcher) => launcher,
        Err(e) => {
            tracing::error!("Failed to initialize launcher: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let report = launcher.start().await;
    if let PipelineOutcome::Failed(e) = &report.manifest {
        tracing::error!("Launcher cannot start: {}", e);
        return ExitCode::FAILURE;
    }

    let button = ui.play_button();
    match button.play_target() {
        Some(entry) => tracing::info!("Ready to play {}", entry.id),
        None => tracing::warn!("Manifest lists no playable version"),
    }

    if play {
        match launcher.play(&button, report.compatibility.as_ref()).await {
            Ok(request) => tracing::info!(
                "Download {} for {} from {}",
                request.version,
                request.platform,
                request.url
            ),
            Err(e) => {
                tracing::error!("Cannot play: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
