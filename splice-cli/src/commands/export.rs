// splice-cli/src/commands/export.rs
//
// The `export` command: compiles a saved project, starts the exporter and
// polls its status into a progress bar until the worker finishes.

use crate::cli::ExportArgs;
use crate::commands::graph::open_timeline;
use crate::commands::load_settings;
use crate::error::CliResult;
use crate::logging::get_timestamp;
use crate::terminal;

use splice_core::{CoreError, ExportPhase, ExportStatus, Exporter, OutputFormat, format_bytes};

use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Picks the output file: `--output` when given, otherwise
/// `<export dir>/<name>.<extension>`.
#[must_use]
pub fn resolve_destination(
    output: Option<&Path>,
    export_dir: &Path,
    name: Option<&str>,
    format: OutputFormat,
) -> PathBuf {
    if let Some(output) = output {
        return output.to_path_buf();
    }
    let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.to_string(),
        None => format!("export_{}", get_timestamp()),
    };
    export_dir.join(format!("{name}.{}", format.extension()))
}

pub fn run_export(args: ExportArgs, workspace: &Path) -> CliResult<()> {
    let settings = load_settings(workspace);
    let (project, timeline) = open_timeline(&args.timeline)?;

    let export_dir = args.export_dir.unwrap_or(settings.export_dir);
    let destination = resolve_destination(
        args.output.as_deref(),
        &export_dir,
        args.name.as_deref(),
        timeline.format,
    );
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let ffmpeg = args.ffmpeg.or(settings.ffmpeg_path);
    debug!("Using ffmpeg: {}", ffmpeg.as_deref().map_or("ffmpeg (PATH)".into(), |p| p.display().to_string()));

    terminal::print_section(&format!("Export: {}", project.name));
    terminal::print_status("Output", &destination.display().to_string(), true);
    terminal::print_status("Format", timeline.format.extension(), false);

    let exporter = Exporter::new().with_ffmpeg_path(ffmpeg);
    let started = Instant::now();
    let handle = exporter.start(&timeline, &project.catalog, &destination)?;

    let bar = terminal::export_progress_bar(&project.name);
    while !handle.is_finished() {
        let status = handle.status();
        bar.set_position(status.progress as u64);
        thread::sleep(POLL_INTERVAL);
    }
    let status = handle.join();
    bar.set_position(status.progress as u64);
    bar.finish_and_clear();

    match status.phase {
        ExportPhase::Succeeded => {
            let size = fs::metadata(&destination).map(|m| m.len()).unwrap_or(0);
            info!(
                "Export finished in {:.1}s: {}",
                started.elapsed().as_secs_f64(),
                destination.display()
            );
            terminal::print_success(&format!(
                "Exported {} ({})",
                destination.display(),
                format_bytes(size)
            ));
            Ok(())
        }
        _ => Err(failure_error(&status)),
    }
}

/// Error reported for an export that ended in the failed state.
///
/// Engine failures already read "Export failed: ..."; the "Error: " prefix of
/// internal failures is dropped because `main` adds its own.
#[must_use]
pub fn failure_error(status: &ExportStatus) -> CoreError {
    let message = status.message.as_str();
    CoreError::ExportFailed(message.strip_prefix("Error: ").unwrap_or(message).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_output_wins() {
        let dest = resolve_destination(
            Some(Path::new("/tmp/cut.mp4")),
            Path::new("/exports"),
            Some("ignored"),
            OutputFormat::Mp3,
        );
        assert_eq!(dest, PathBuf::from("/tmp/cut.mp4"));
    }

    #[test]
    fn test_named_export_uses_format_extension() {
        let dest = resolve_destination(None, Path::new("/exports"), Some("podcast"), OutputFormat::Mp3);
        assert_eq!(dest, PathBuf::from("/exports/podcast.mp3"));
    }

    #[test]
    fn test_blank_name_falls_back_to_timestamp() {
        let dest = resolve_destination(None, Path::new("/exports"), Some("  "), OutputFormat::Mp4);
        let file = dest.file_name().unwrap().to_string_lossy().into_owned();
        assert!(file.starts_with("export_"));
        assert!(file.ends_with(".mp4"));
        assert_eq!(dest.parent(), Some(Path::new("/exports")));
    }

    fn failed(message: &str) -> ExportStatus {
        ExportStatus {
            phase: ExportPhase::Failed,
            message: message.to_string(),
            ..ExportStatus::default()
        }
    }

    #[test]
    fn test_engine_failure_is_not_reported_as_worker_failure() {
        let err = failure_error(&failed("Export failed: Conversion failed!"));
        assert!(matches!(err, CoreError::ExportFailed(_)));
        assert_eq!(err.to_string(), "Export failed: Conversion failed!");
    }

    #[test]
    fn test_internal_failure_drops_error_prefix() {
        let err = failure_error(&failed("Error: Failed to start ffmpeg: not found"));
        assert_eq!(err.to_string(), "Failed to start ffmpeg: not found");
    }
}
