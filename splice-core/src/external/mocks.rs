// splice-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

use super::*;
use crate::error::{CoreError, CoreResult, command_start_error};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex};

/// An ffmpeg stderr line as the sidecar reports it.
pub fn log_line(line: &str) -> FfmpegEvent {
    FfmpegEvent::Log(LogLevel::Info, line.to_string())
}

/// A progress-style stderr line at the given clock position.
pub fn progress_line(clock: &str) -> FfmpegEvent {
    log_line(&format!(
        "frame=  120 fps= 30 q=28.0 size=    512kB time={clock} bitrate= 900.1kbits/s speed=1.5x"
    ))
}

/// Mock implementation of FfmpegProcess.
pub struct MockFfmpegProcess {
    events: Vec<FfmpegEvent>,
    exit_status: ExitStatus,
    gate: Option<Receiver<()>>,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        if let Some(gate) = self.gate.take() {
            // A dropped sender releases the process as well.
            let _ = gate.recv();
        }
        for event in self.events.drain(..) {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

enum Scripted {
    Run(MockFfmpegProcess),
    SpawnError(io::ErrorKind),
}

/// Mock implementation of FfmpegSpawner playing back scripted runs in order.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    received_calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a run that emits `events` and exits with `exit_code`.
    pub fn push_run(&self, events: Vec<FfmpegEvent>, exit_code: i32) {
        self.push(Scripted::Run(MockFfmpegProcess {
            events,
            exit_status: ExitStatus::from_raw(exit_code << 8),
            gate: None,
        }));
    }

    /// Queues a run that blocks until the returned sender fires (or drops).
    pub fn push_gated_run(&self, events: Vec<FfmpegEvent>, exit_code: i32) -> Sender<()> {
        let (tx, rx) = channel();
        self.push(Scripted::Run(MockFfmpegProcess {
            events,
            exit_status: ExitStatus::from_raw(exit_code << 8),
            gate: Some(rx),
        }));
        tx
    }

    /// Queues a spawn failure.
    pub fn push_spawn_error(&self, kind: io::ErrorKind) {
        self.push(Scripted::SpawnError(kind));
    }

    fn push(&self, entry: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push_back(entry);
    }

    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args = command_args(&cmd);
        self.received_calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(args.clone());

        let next = self
            .script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .pop_front();
        match next {
            Some(Scripted::Run(process)) => Ok(process),
            Some(Scripted::SpawnError(kind)) => Err(command_start_error(
                "ffmpeg (mock)",
                io::Error::new(kind, "scripted spawn failure"),
            )),
            None => panic!("MockFfmpegSpawner: no scripted run for command args: {args:?}"),
        }
    }
}

/// Mock implementation of MediaProber keyed by path.
#[derive(Default)]
pub struct MockProber {
    results: Mutex<HashMap<PathBuf, ProbedMedia>>,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect(&self, path: &str, media: ProbedMedia) {
        self.results
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(PathBuf::from(path), media);
    }
}

impl MediaProber for MockProber {
    fn probe(&self, path: &Path) -> CoreResult<ProbedMedia> {
        self.results
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(path)
            .cloned()
            .ok_or_else(|| {
                CoreError::FfprobeParse(format!(
                    "MockProber: no expectation set for path {}",
                    path.display()
                ))
            })
    }
}
