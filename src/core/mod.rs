// ─── Launcher Bootstrap Core ───
// Everything the launcher does between process start and the main screen.
//
// Architecture:
//   core/
//     config/    — Endpoints, paths, env overrides
//     state/     — Persisted settings + shared version manifest handle
//     loader/    — Manifest download / local override, single-shot adapter
//     signing/   — Cleartext envelope, launcher key, Ed25519 verification
//     version/   — Manifest model, version ordering, launcher self-check
//     pipeline/  — fetch → verify → parse → reconcile → UI
//     ui/        — UiSink trait and its front-ends
//     compat/    — Hardware compatibility check
//     play/      — Version select / play button state
//     news/      — RSS news panels

pub mod compat;
pub mod config;
pub mod error;
pub mod http;
pub mod loader;
pub mod news;
pub mod pipeline;
pub mod play;
pub mod signing;
pub mod state;
pub mod ui;
pub mod version;
