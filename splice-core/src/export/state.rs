// ============================================================================
// splice-core/src/export/state.rs
// ============================================================================
//
// EXPORT STATE: Shared, Pollable Status of the Current Export
//
// `ExportState` is a cheap-to-clone handle around `Arc<Mutex<ExportStatus>>`.
// The worker thread writes through it; callers poll `snapshot()`.
//
// LIFECYCLE:
//   Idle -> Running -> Succeeded | Failed
// A terminal state persists until the next successful `try_begin`.

use crate::error::{CoreError, CoreResult};

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Phase of the export state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportPhase {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl ExportPhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ExportPhase::Succeeded | ExportPhase::Failed)
    }
}

/// Snapshot of the export status as seen by a poller.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatus {
    pub phase: ExportPhase,
    pub running: bool,
    /// Percentage in `[0, 100]`, one decimal.
    pub progress: f64,
    pub message: String,
    /// Destination of the current or last export.
    pub path: Option<PathBuf>,
}

/// Shared handle to the export status.
#[derive(Debug, Clone, Default)]
pub struct ExportState {
    inner: Arc<Mutex<ExportStatus>>,
}

impl ExportState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ExportStatus> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current status.
    #[must_use]
    pub fn snapshot(&self) -> ExportStatus {
        self.lock().clone()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Moves to `Running` for `destination`, or fails with
    /// `ExportInProgress` without touching the status.
    pub fn try_begin(&self, destination: &Path) -> CoreResult<()> {
        let mut status = self.lock();
        if status.running {
            return Err(CoreError::ExportInProgress);
        }
        *status = ExportStatus {
            phase: ExportPhase::Running,
            running: true,
            progress: 0.0,
            message: "Starting...".to_string(),
            path: Some(destination.to_path_buf()),
        };
        Ok(())
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.lock().message = message.into();
    }

    /// Records a new progress value and the matching message.
    pub fn set_progress(&self, percent: f64) {
        let mut status = self.lock();
        status.progress = percent;
        status.message = format!("Encoding... {percent:.1}%");
    }

    pub fn succeed(&self) {
        let mut status = self.lock();
        status.phase = ExportPhase::Succeeded;
        status.running = false;
        status.progress = 100.0;
        status.message = "Done!".to_string();
    }

    pub fn fail(&self, message: impl Into<String>) {
        let mut status = self.lock();
        status.phase = ExportPhase::Failed;
        status.running = false;
        status.message = message.into();
    }

    /// Clears the running flag; a phase still `Running` becomes `Failed`.
    pub(crate) fn release(&self) {
        let mut status = self.lock();
        if status.phase == ExportPhase::Running {
            status.phase = ExportPhase::Failed;
            status.message = "Error: export worker stopped unexpectedly".to_string();
        }
        status.running = false;
    }
}

/// Releases the state when dropped, including during unwinding.
pub(crate) struct RunningGuard {
    state: ExportState,
}

impl RunningGuard {
    pub(crate) fn new(state: ExportState) -> Self {
        Self { state }
    }
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.state.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle() {
        let status = ExportState::new().snapshot();
        assert_eq!(status.phase, ExportPhase::Idle);
        assert!(!status.running);
        assert_eq!(status.path, None);
    }

    #[test]
    fn test_begin_rejects_while_running_without_mutation() {
        let state = ExportState::new();
        state.try_begin(Path::new("/out/a.mp4")).unwrap();
        state.set_progress(42.5);
        let before = state.snapshot();

        let err = state.try_begin(Path::new("/out/b.mp4")).unwrap_err();
        assert!(matches!(err, CoreError::ExportInProgress));
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_terminal_state_persists_until_next_begin() {
        let state = ExportState::new();
        state.try_begin(Path::new("/out/a.mp4")).unwrap();
        state.fail("Export failed: boom");
        assert_eq!(state.snapshot().phase, ExportPhase::Failed);
        assert!(state.snapshot().phase.is_terminal());

        state.try_begin(Path::new("/out/b.mp4")).unwrap();
        let status = state.snapshot();
        assert_eq!(status.phase, ExportPhase::Running);
        assert_eq!(status.message, "Starting...");
        assert_eq!(status.progress, 0.0);
    }

    #[test]
    fn test_guard_fails_unfinished_export() {
        let state = ExportState::new();
        state.try_begin(Path::new("/out/a.mp4")).unwrap();
        drop(RunningGuard::new(state.clone()));

        let status = state.snapshot();
        assert!(!status.running);
        assert_eq!(status.phase, ExportPhase::Failed);
    }

    #[test]
    fn test_guard_keeps_success() {
        let state = ExportState::new();
        state.try_begin(Path::new("/out/a.mp4")).unwrap();
        {
            let _guard = RunningGuard::new(state.clone());
            state.succeed();
        }
        let status = state.snapshot();
        assert_eq!(status.phase, ExportPhase::Succeeded);
        assert_eq!(status.progress, 100.0);
        assert_eq!(status.message, "Done!");
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let json = serde_json::to_value(ExportState::new().snapshot()).unwrap();
        assert_eq!(json["phase"], "idle");
        assert_eq!(json["running"], false);
    }
}
