pub mod core;
pub mod startup;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub use crate::core::config::LauncherConfig;
pub use crate::core::error::{LauncherError, LauncherResult};
pub use crate::core::pipeline::{ManifestPipeline, PipelineOutcome};
pub use crate::core::ui::UiSink;
pub use crate::startup::{Launcher, StartupReport};

/// Initialize structured logging. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,launcher_bootstrap=debug")),
        )
        .try_init();
}

static PANIC_HOOK: Once = Once::new();

/// Route panics through the log before the default hook prints them.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            tracing::error!("Unhandled launcher error: {}", panic_info);
            default_hook(panic_info);
        }));
    });
}
