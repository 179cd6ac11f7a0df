// splice-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use splice_core::OutputFormat;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Splice: timeline compiler and exporter",
    long_about = "Compiles multi-track timelines (clips with trim, offset, speed and volume) \
                  into a single ffmpeg filter graph and exports the result."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace directory holding settings, projects and default exports
    #[arg(long, global = true, value_name = "DIR", env = "SPLICE_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe media files and optionally lay them end to end in a new project
    Probe(ProbeArgs),

    /// Print the filter graph a project compiles to
    Graph(GraphArgs),

    /// Export a project through ffmpeg
    Export(ExportArgs),

    /// List the projects saved in the project directory
    Projects,

    /// Show or change persisted settings
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Media files to probe
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Print the probed assets as JSON
    #[arg(long)]
    pub json: bool,

    /// Save a project with the files placed back to back on track 0
    #[arg(long, value_name = "NAME")]
    pub project: Option<String>,
}

/// Options shared by every command that compiles a project.
#[derive(Args, Debug, Clone)]
pub struct TimelineArgs {
    /// Project file (.spliceproj)
    #[arg(value_name = "PROJECT")]
    pub project: PathBuf,

    /// Override the project's output format (mp4 or mp3)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Override the timeline duration in seconds
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f64>,
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(flatten)]
    pub timeline: TimelineArgs,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub timeline: TimelineArgs,

    /// Destination file; defaults to <export dir>/<name>.<format>
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Base name of the exported file when --output is not given
    /// (defaults to export_<timestamp>)
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Directory for exports, overriding the settings file
    #[arg(long, value_name = "DIR", env = "SPLICE_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,

    /// ffmpeg executable to use instead of the one on PATH
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Set the project directory
    #[arg(long, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Set the export directory
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Set the ffmpeg executable
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,
}

impl SettingsArgs {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.project_dir.is_some() || self.export_dir.is_some() || self.ffmpeg.is_some()
    }
}
