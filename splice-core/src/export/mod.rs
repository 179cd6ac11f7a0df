// ============================================================================
// splice-core/src/export/mod.rs
// ============================================================================
//
// EXPORT: Running a Compiled Timeline Through ffmpeg
//
// - plan: binds a compiled timeline to a destination and builds the command
// - progress: diagnostic stream to percentage and failure excerpt
// - state: the pollable Idle/Running/Succeeded/Failed status
// - orchestrator: the `Exporter` that ties them together on a worker thread

pub mod orchestrator;
pub mod plan;
pub mod progress;
pub mod state;

pub use orchestrator::{ExportHandle, Exporter};
pub use plan::ExportPlan;
pub use progress::{DiagnosticTail, ExportProgressHandler, ProgressTracker};
pub use state::{ExportPhase, ExportState, ExportStatus};
