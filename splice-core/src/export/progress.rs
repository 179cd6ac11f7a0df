//! `FFmpeg` progress handling for exports
//!
//! Turns the engine's diagnostic stream into a monotonic percentage of the
//! expected output duration and keeps a bounded tail of diagnostic lines for
//! failure reports.

use crate::config::{DIAGNOSTIC_TAIL_LINES, FAILURE_EXCERPT_CHARS, PROGRESS_CAP_RUNNING};
use crate::utils::{extract_time_marker, parse_ffmpeg_time, tail_chars};
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel as FfmpegLogLevel};
use std::collections::VecDeque;

/// Monotonic percentage tracker.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: f64,
    last: f64,
}

impl ProgressTracker {
    #[must_use]
    pub fn new(total: f64) -> Self {
        Self { total, last: 0.0 }
    }

    /// Feeds an encoded position in seconds. Returns the new percentage when
    /// it moved forward.
    pub fn update(&mut self, position: f64) -> Option<f64> {
        if self.total <= 0.0 || !self.total.is_finite() || !position.is_finite() {
            return None;
        }
        let percent = (position / self.total * 100.0).clamp(0.0, PROGRESS_CAP_RUNNING);
        let percent = (percent * 10.0).round() / 10.0;
        if percent > self.last {
            self.last = percent;
            Some(percent)
        } else {
            None
        }
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.last
    }
}

/// The last diagnostic lines the engine printed.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticTail {
    lines: VecDeque<String>,
}

impl DiagnosticTail {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: &str) {
        let line = line.trim_end();
        if line.is_empty() {
            return;
        }
        if self.lines.len() == DIAGNOSTIC_TAIL_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back(line.to_string());
    }

    /// The kept lines joined with newlines, cut to the last characters shown
    /// in failure messages.
    #[must_use]
    pub fn excerpt(&self) -> String {
        let joined = self.lines.iter().map(String::as_str).collect::<Vec<_>>().join("\n");
        tail_chars(&joined, FAILURE_EXCERPT_CHARS).to_string()
    }

    /// The kept lines, oldest first.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Error events that do not indicate a failed export.
///
/// ffmpeg-sidecar reports "No streams found" whenever the output is a file
/// rather than stdout, which is true for every export.
fn is_non_critical_engine_error(error: &str) -> bool {
    error.contains("No streams found")
        || error.contains("deprecated pixel format")
        || error.contains("automatically inserted filter")
        || error.contains("Timestamps are unset")
        || error.contains("Queue input is backward")
}

/// Handler for the events of one export run.
#[derive(Debug, Clone)]
pub struct ExportProgressHandler {
    tracker: ProgressTracker,
    tail: DiagnosticTail,
}

impl ExportProgressHandler {
    #[must_use]
    pub fn new(total: f64) -> Self {
        Self {
            tracker: ProgressTracker::new(total),
            tail: DiagnosticTail::new(),
        }
    }

    /// Handles one event; returns a new percentage when progress advanced.
    pub fn handle_event(&mut self, event: FfmpegEvent) -> Option<f64> {
        match event {
            FfmpegEvent::Progress(progress) => {
                self.tail.push(&progress.raw_log_message);
                parse_ffmpeg_time(&progress.time)
                    .or_else(|| extract_time_marker(&progress.raw_log_message))
                    .and_then(|secs| self.tracker.update(secs))
            }
            FfmpegEvent::Log(level, line) => {
                if matches!(level, FfmpegLogLevel::Error | FfmpegLogLevel::Fatal) {
                    log::warn!(target: "ffmpeg_log", "{line}");
                } else {
                    log::trace!(target: "ffmpeg_log", "{line}");
                }
                self.handle_line(&line)
            }
            FfmpegEvent::Error(line) if is_non_critical_engine_error(&line) => {
                log::trace!(target: "ffmpeg_log", "ignored: {line}");
                None
            }
            FfmpegEvent::Error(line) => {
                log::debug!("ffmpeg stderr error: {line}");
                self.handle_line(&line)
            }
            _ => None,
        }
    }

    fn handle_line(&mut self, line: &str) -> Option<f64> {
        self.tail.push(line);
        extract_time_marker(line).and_then(|secs| self.tracker.update(secs))
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.tracker.percent()
    }

    #[must_use]
    pub fn tail(&self) -> &DiagnosticTail {
        &self.tail
    }
}
