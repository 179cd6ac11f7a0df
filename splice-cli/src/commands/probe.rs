// splice-cli/src/commands/probe.rs
//
// The `probe` command: ingests media files with ffprobe, prints what the
// catalog recorded and optionally saves them as a back-to-back project.

use crate::cli::ProbeArgs;
use crate::commands::load_settings;
use crate::error::CliResult;
use crate::terminal;

use splice_core::{
    Clip, CrateFfprobeExecutor, MediaAsset, MediaCatalog, MediaProber, OutputFormat, Project,
    Timeline, format_duration, save_project,
};

use log::{debug, warn};
use std::path::Path;

/// Runs the probe command with the production ffprobe backend.
pub fn run_probe(args: ProbeArgs, workspace: &Path) -> CliResult<()> {
    run_probe_with(&CrateFfprobeExecutor::new(), args, workspace)
}

/// Runs the probe command against any `MediaProber`.
pub fn run_probe_with<P: MediaProber + ?Sized>(
    prober: &P,
    args: ProbeArgs,
    workspace: &Path,
) -> CliResult<()> {
    let mut catalog = MediaCatalog::new();
    let mut ingested: Vec<MediaAsset> = Vec::with_capacity(args.files.len());
    for file in &args.files {
        let asset = catalog.ingest(prober, file)?.clone();
        debug!("Probed {} -> {}", file.display(), asset.id);
        ingested.push(asset);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ingested)?);
    } else {
        terminal::print_section("Media");
        for asset in &ingested {
            print_asset(asset);
        }
    }

    if let Some(name) = args.project.as_deref() {
        let timeline = back_to_back(&ingested);
        let settings = load_settings(workspace);
        let project = Project::capture(name, &timeline, &catalog);
        let path = save_project(&project, &settings.project_dir)?;
        if !args.json {
            terminal::print_success(&format!("Saved project to {}", path.display()));
        }
    }

    Ok(())
}

fn print_asset(asset: &MediaAsset) {
    println!("{}", asset.name);
    terminal::print_status("Id", asset.id.as_str(), true);
    terminal::print_status("Duration", &format_duration(asset.duration), false);
    let streams = match (asset.has_video, asset.has_audio) {
        (true, true) => "video + audio",
        (true, false) => "video only",
        (false, true) => "audio only",
        (false, false) => "none",
    };
    terminal::print_status("Streams", streams, false);
    if asset.has_dimensions() {
        terminal::print_status(
            "Resolution",
            &format!("{}x{}", asset.width, asset.height),
            false,
        );
    }
    println!();
}

/// Lays the assets end to end on track 0, in the order given.
///
/// The project exports as mp3 when none of the assets carries video.
pub fn back_to_back(assets: &[MediaAsset]) -> Timeline {
    let mut offset = 0.0;
    let mut clips = Vec::with_capacity(assets.len());
    for asset in assets {
        clips.push(Clip::new(asset.id.clone(), offset).with_trim(0.0, asset.duration));
        offset += asset.duration;
    }

    let format = if assets.iter().any(|a| a.has_video) {
        OutputFormat::Mp4
    } else {
        warn!("No video streams among the probed files; the project will export as mp3");
        OutputFormat::Mp3
    };
    Timeline::new(clips).with_format(format)
}
