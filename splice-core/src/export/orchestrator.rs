// ============================================================================
// splice-core/src/export/orchestrator.rs
// ============================================================================
//
// EXPORT ORCHESTRATOR: Compile, Launch and Track One Export
//
// `Exporter::start` compiles the timeline synchronously, so configuration
// errors and the single-export conflict are returned to the caller before any
// state changes. The engine itself runs on a dedicated worker thread that
// feeds progress into the shared `ExportState`.
//
// WORKER FLOW:
// 1. Spawn ffmpeg through the injected `FfmpegSpawner`
// 2. Stream diagnostic events into `ExportProgressHandler`
// 3. Wait for exit; 0 -> Succeeded, anything else -> Failed with the tail
//
// A `RunningGuard` owned by the worker clears the running flag on every exit
// path, panics included.

use super::plan::ExportPlan;
use super::progress::ExportProgressHandler;
use super::state::{ExportState, ExportStatus, RunningGuard};
use crate::catalog::MediaCatalog;
use crate::compiler::compile;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegProcess, FfmpegSpawner, SidecarSpawner};
use crate::timeline::Timeline;

use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Runs exports one at a time and exposes their status.
pub struct Exporter<S: FfmpegSpawner = SidecarSpawner> {
    spawner: Arc<S>,
    state: ExportState,
    ffmpeg_path: Option<PathBuf>,
}

impl Exporter<SidecarSpawner> {
    /// Exporter driving the real ffmpeg.
    #[must_use]
    pub fn new() -> Self {
        Self::with_spawner(SidecarSpawner)
    }
}

impl Default for Exporter<SidecarSpawner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FfmpegSpawner> Exporter<S> {
    #[must_use]
    pub fn with_spawner(spawner: S) -> Self {
        Self {
            spawner: Arc::new(spawner),
            state: ExportState::new(),
            ffmpeg_path: None,
        }
    }

    /// Uses a specific ffmpeg executable instead of the one on `PATH`.
    #[must_use]
    pub fn with_ffmpeg_path(mut self, path: Option<PathBuf>) -> Self {
        self.ffmpeg_path = path;
        self
    }

    /// Shared handle to the status, for pollers on other threads.
    #[must_use]
    pub fn state(&self) -> ExportState {
        self.state.clone()
    }

    #[must_use]
    pub fn status(&self) -> ExportStatus {
        self.state.snapshot()
    }

    /// Starts exporting `timeline` to `destination` and returns immediately.
    ///
    /// Fails without touching the status when an export is already running
    /// or when the timeline does not compile.
    pub fn start(
        &self,
        timeline: &Timeline,
        catalog: &MediaCatalog,
        destination: &Path,
    ) -> CoreResult<ExportHandle> {
        if self.state.is_running() {
            return Err(CoreError::ExportInProgress);
        }

        let plan = ExportPlan::new(compile(timeline, catalog)?, destination);
        let cmd = plan.to_command(self.ffmpeg_path.clone())?;

        self.state.try_begin(destination)?;
        log::info!(
            "Export started: {} ({:.3}s, {} input(s))",
            destination.display(),
            plan.duration(),
            plan.compiled.inputs.len()
        );

        let spawner = Arc::clone(&self.spawner);
        let state = self.state.clone();
        let duration = plan.duration();
        let worker = thread::Builder::new()
            .name("splice-export".to_string())
            .spawn(move || {
                let _guard = RunningGuard::new(state.clone());
                run_export(spawner.as_ref(), cmd, duration, &state);
            });

        match worker {
            Ok(join) => Ok(ExportHandle {
                join,
                state: self.state.clone(),
            }),
            Err(err) => {
                log::error!("Failed to start export worker: {err}");
                self.state.fail(format!("Error: {err}"));
                Err(CoreError::Worker(err.to_string()))
            }
        }
    }
}

/// Handle to a running export.
pub struct ExportHandle {
    join: JoinHandle<()>,
    state: ExportState,
}

impl ExportHandle {
    #[must_use]
    pub fn status(&self) -> ExportStatus {
        self.state.snapshot()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Blocks until the worker exits and returns the final status.
    pub fn join(self) -> ExportStatus {
        if self.join.join().is_err() {
            log::error!("Export worker panicked");
        }
        self.state.snapshot()
    }
}

/// Worker body: runs the engine and records the outcome in `state`.
fn run_export<S: FfmpegSpawner + ?Sized>(
    spawner: &S,
    cmd: FfmpegCommand,
    duration: f64,
    state: &ExportState,
) {
    match drive_engine(spawner, cmd, duration, state) {
        Ok(None) => {
            log::info!("Export finished");
            state.succeed();
        }
        Ok(Some(excerpt)) => {
            log::error!("Export failed: {excerpt}");
            state.fail(format!("Export failed: {excerpt}"));
        }
        Err(err) => {
            log::error!("Export error: {err}");
            state.fail(format!("Error: {err}"));
        }
    }
}

/// Returns `Ok(None)` on a clean exit and `Ok(Some(excerpt))` when the
/// engine exited with a failure status.
fn drive_engine<S: FfmpegSpawner + ?Sized>(
    spawner: &S,
    cmd: FfmpegCommand,
    duration: f64,
    state: &ExportState,
) -> CoreResult<Option<String>> {
    let mut child = spawner.spawn(cmd)?;
    state.set_message("Encoding...");

    let mut handler = ExportProgressHandler::new(duration);
    child.handle_events(|event| {
        if let Some(percent) = handler.handle_event(event) {
            state.set_progress(percent);
        }
        Ok(())
    })?;

    let status = child.wait()?;
    if status.success() {
        Ok(None)
    } else {
        let excerpt = handler.tail().excerpt();
        if excerpt.is_empty() {
            Ok(Some(format!("ffmpeg exited with {status}")))
        } else {
            Ok(Some(excerpt))
        }
    }
}
