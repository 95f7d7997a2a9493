// ─── Compatibility Check ───
// Hardware sanity check run once at startup and consulted again when the
// user presses play. Problems are warnings: the user may still play.

use std::fmt;
use std::future::Future;

use tracing::{info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::ui::UiSink;

const MIN_MEMORY_BYTES: u64 = 4 * 1024 * 1024 * 1024;
const MIN_LOGICAL_CPUS: usize = 2;

/// Snapshot of the machine the launcher runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemReport {
    pub total_memory_bytes: u64,
    pub logical_cpus: usize,
    pub os_name: String,
    pub is_64_bit: bool,
}

impl SystemReport {
    pub fn collect() -> Self {
        let mut system = sysinfo::System::new_all();
        system.refresh_all();

        Self {
            total_memory_bytes: system.total_memory(),
            logical_cpus: system.cpus().len(),
            os_name: sysinfo::System::long_os_version()
                .unwrap_or_else(|| std::env::consts::OS.to_string()),
            is_64_bit: cfg!(target_pointer_width = "64"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompatibilityIssue {
    Not64Bit,
    LowMemory { available: u64, required: u64 },
    TooFewCpus { available: usize, required: usize },
}

impl fmt::Display for CompatibilityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompatibilityIssue::Not64Bit => write!(f, "a 64-bit operating system is required"),
            CompatibilityIssue::LowMemory {
                available,
                required,
            } => write!(
                f,
                "{} MiB of memory found, {} MiB recommended",
                available / (1024 * 1024),
                required / (1024 * 1024)
            ),
            CompatibilityIssue::TooFewCpus {
                available,
                required,
            } => write!(f, "{available} CPU cores found, {required} recommended"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompatibilityReport {
    pub system: SystemReport,
    pub issues: Vec<CompatibilityIssue>,
}

impl CompatibilityReport {
    pub fn is_compatible(&self) -> bool {
        self.issues.is_empty()
    }

    /// Text for the warning dialog shown before playing.
    pub fn warning_message(&self) -> Option<String> {
        if self.issues.is_empty() {
            return None;
        }
        let details = self
            .issues
            .iter()
            .map(|i| format!("- {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        Some(format!(
            "Your computer may not be able to run the game:\n{details}"
        ))
    }
}

pub fn evaluate(system: &SystemReport) -> Vec<CompatibilityIssue> {
    let mut issues = Vec::new();
    if !system.is_64_bit {
        issues.push(CompatibilityIssue::Not64Bit);
    }
    if system.total_memory_bytes < MIN_MEMORY_BYTES {
        issues.push(CompatibilityIssue::LowMemory {
            available: system.total_memory_bytes,
            required: MIN_MEMORY_BYTES,
        });
    }
    if system.logical_cpus < MIN_LOGICAL_CPUS {
        issues.push(CompatibilityIssue::TooFewCpus {
            available: system.logical_cpus,
            required: MIN_LOGICAL_CPUS,
        });
    }
    issues
}

/// Gather system info off the async runtime and log the verdict.
pub async fn check_if_compatible() -> LauncherResult<CompatibilityReport> {
    let system = tokio::task::spawn_blocking(SystemReport::collect)
        .await
        .map_err(|e| LauncherError::Other(format!("System check failed: {e}")))?;

    let issues = evaluate(&system);
    if issues.is_empty() {
        info!(
            "System check passed: {}, {} CPUs, {} MiB",
            system.os_name,
            system.logical_cpus,
            system.total_memory_bytes / (1024 * 1024)
        );
    } else {
        for issue in &issues {
            warn!("Compatibility: {}", issue);
        }
    }

    Ok(CompatibilityReport { system, issues })
}

/// Warn about known problems (waiting for the dialog to close), then continue.
pub async fn perform_compatibility_check<F, Fut>(
    ui: &dyn UiSink,
    report: Option<&CompatibilityReport>,
    on_ok: F,
) -> Fut::Output
where
    F: FnOnce() -> Fut,
    Fut: Future,
{
    if let Some(message) = report.and_then(CompatibilityReport::warning_message) {
        ui.show_generic_error(&message).await;
    }
    on_ok().await
}
