//! The engine invocation for one export.

use crate::compiler::CompiledTimeline;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegCommandBuilder, add_filter_graph, add_inputs, add_output};
use ffmpeg_sidecar::command::FfmpegCommand;
use std::path::{Path, PathBuf};

/// A compiled timeline bound to a destination file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    pub compiled: CompiledTimeline,
    pub destination: PathBuf,
}

impl ExportPlan {
    #[must_use]
    pub fn new(compiled: CompiledTimeline, destination: &Path) -> Self {
        Self {
            compiled,
            destination: destination.to_path_buf(),
        }
    }

    /// Output length in seconds; also the progress total.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.compiled.duration
    }

    /// Builds the ffmpeg command: inputs, graph, video then audio map,
    /// duration clamp, overwritten destination.
    pub fn to_command(&self, program: Option<PathBuf>) -> CoreResult<FfmpegCommand> {
        let graph = self
            .compiled
            .graph
            .render()
            .ok_or(CoreError::NoOutputStreams)?;
        let outputs = self.compiled.output_labels();
        if outputs.is_empty() {
            return Err(CoreError::NoOutputStreams);
        }

        let mut cmd = FfmpegCommandBuilder::new().with_program(program).build();
        add_inputs(&mut cmd, &self.compiled.inputs);
        add_filter_graph(&mut cmd, &graph, &outputs);
        add_output(&mut cmd, self.compiled.duration, &self.destination);

        log::debug!("Filter graph: {graph}");
        Ok(cmd)
    }
}
