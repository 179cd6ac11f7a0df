//! FFmpeg command builder utilities
//!
//! This module provides a builder for constructing FFmpeg commands with the
//! options every splice invocation shares (program override, banner,
//! overwrite) and a helper to attach a compiled filter graph.

use crate::graph::Label;
use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::{Path, PathBuf};

/// Builder for creating `FFmpeg` commands with common configurations
#[derive(Debug, Clone)]
pub struct FfmpegCommandBuilder {
    program: Option<PathBuf>,
    hide_banner: bool,
    overwrite: bool,
}

impl Default for FfmpegCommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegCommandBuilder {
    /// Creates a new `FFmpeg` command builder with sensible defaults
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: None,
            hide_banner: true,
            overwrite: true,
        }
    }

    /// Uses `program` instead of the `ffmpeg` found on `PATH`
    #[must_use]
    pub fn with_program(mut self, program: Option<PathBuf>) -> Self {
        self.program = program;
        self
    }

    /// Sets whether to hide the `FFmpeg` banner
    #[must_use]
    pub fn with_hide_banner(mut self, hide: bool) -> Self {
        self.hide_banner = hide;
        self
    }

    /// Sets whether an existing destination is replaced (`-y`)
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Builds the `FFmpeg` command with all configured options
    #[must_use]
    pub fn build(self) -> FfmpegCommand {
        let mut cmd = match &self.program {
            Some(program) => FfmpegCommand::new_with_path(program),
            None => FfmpegCommand::new(),
        };

        if self.hide_banner {
            cmd.arg("-hide_banner");
        }
        if self.overwrite {
            cmd.arg("-y");
        }
        cmd
    }
}

/// Adds one `-i` per path, in order.
pub fn add_inputs(cmd: &mut FfmpegCommand, inputs: &[PathBuf]) {
    for input in inputs {
        cmd.input(input.to_string_lossy().as_ref());
    }
}

/// Adds `-filter_complex` and one `-map` per output label.
pub fn add_filter_graph(cmd: &mut FfmpegCommand, graph: &str, outputs: &[&Label]) {
    cmd.arg("-filter_complex");
    cmd.arg(graph);
    for label in outputs {
        cmd.arg("-map");
        cmd.arg(label.to_string());
    }
}

/// Clamps the output to `seconds` and sets the destination.
pub fn add_output(cmd: &mut FfmpegCommand, seconds: f64, destination: &Path) {
    cmd.arg("-t");
    cmd.arg(format!("{seconds:.6}"));
    cmd.output(destination.to_string_lossy().as_ref());
}

/// Collects the arguments of `cmd` as strings.
#[must_use]
pub fn command_args(cmd: &FfmpegCommand) -> Vec<String> {
    cmd.get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}
