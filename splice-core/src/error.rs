// ============================================================================
// splice-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Splice Core Library
//
// Every fallible operation in the library returns `CoreResult<T>`. Errors fall
// into four groups: configuration errors detected before an export starts,
// the single-export conflict, engine (ffmpeg/ffprobe) failures, and plain
// I/O or serialization failures from persistence.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

use crate::timeline::FileId;

/// Errors produced by the splice core library.
#[derive(Error, Debug)]
pub enum CoreError {
    // ---- Configuration errors ----
    #[error("No clips supplied")]
    NoClips,

    #[error("Clip {index} references unknown file id '{file_id}'")]
    UnknownFile { index: usize, file_id: FileId },

    #[error("Clip {index} is invalid: {reason}")]
    InvalidClip { index: usize, reason: String },

    #[error("Timeline produces neither a video nor an audio output stream")]
    NoOutputStreams,

    // ---- Concurrency ----
    #[error("An export is already running")]
    ExportInProgress,

    // ---- External tools ----
    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed waiting for {0}: {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("{tool} exited with {status}: {stderr}")]
    CommandFailed {
        tool: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("ffprobe output could not be interpreted: {0}")]
    FfprobeParse(String),

    #[error("Media rejected: {0}")]
    UnsupportedMedia(String),

    // ---- Persistence ----
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported project version {0}")]
    ProjectVersion(u32),

    #[error("Path error: {0}")]
    PathError(String),

    #[error("Export worker failed: {0}")]
    Worker(String),

    /// A finished export that ended in the failed state; carries the
    /// status message.
    #[error("{0}")]
    ExportFailed(String),
}

/// Result type for splice-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// True for the errors a caller can fix by editing the timeline.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CoreError::NoClips
                | CoreError::UnknownFile { .. }
                | CoreError::InvalidClip { .. }
                | CoreError::NoOutputStreams
        )
    }
}

pub fn command_start_error(tool: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(tool.into(), err)
}

pub fn command_wait_error(tool: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(tool.into(), err)
}

pub fn command_failed_error(
    tool: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        tool: tool.into(),
        status,
        stderr: stderr.into(),
    }
}
