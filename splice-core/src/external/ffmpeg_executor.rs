// ============================================================================
// splice-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: Engine Process Seam
//
// The export worker drives ffmpeg only through `FfmpegSpawner` and
// `FfmpegProcess`. Production exports use `SidecarSpawner`; unit and
// integration tests script the diagnostic stream and the exit code instead.

use super::ffmpeg_builder::command_args;
use crate::error::{CoreError, CoreResult, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

const ENGINE: &str = "ffmpeg";

/// A running engine process.
pub trait FfmpegProcess {
    /// Feeds every diagnostic event to `handler` until the stream ends.
    ///
    /// An error from `handler` stops the loop and is returned; the process
    /// must not be left running in that case.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the process to exit.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Starts engine processes. Shared with the export worker thread.
pub trait FfmpegSpawner: Send + Sync + 'static {
    type Process: FfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

/// `FfmpegChild` from ffmpeg-sidecar behind `FfmpegProcess`.
pub struct SidecarProcess {
    child: FfmpegChild,
}

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.child.iter().map_err(|e| {
            CoreError::Worker(format!("{ENGINE} diagnostic stream unavailable: {e}"))
        })?;

        for event in events {
            if let Err(err) = handler(event) {
                log::warn!("Stopping {ENGINE} after handler error: {err}");
                if let Err(kill_err) = self.child.kill() {
                    log::debug!("Could not kill {ENGINE}: {kill_err}");
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.child
            .wait()
            .map_err(|e| command_wait_error(ENGINE, e))
    }
}

/// Spawns the system (or configured) ffmpeg through ffmpeg-sidecar.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        log::debug!("Spawning {ENGINE} {}", command_args(&cmd).join(" "));
        let child = cmd.spawn().map_err(|e| command_start_error(ENGINE, e))?;
        Ok(SidecarProcess { child })
    }
}
