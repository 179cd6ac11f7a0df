// splice-cli/src/commands/settings.rs
//
// The `settings` command: shows the effective settings, or updates and
// persists them when any option is given.

use crate::cli::SettingsArgs;
use crate::commands::{load_settings, settings_path};
use crate::error::CliResult;
use crate::terminal;

use splice_core::Settings;
use std::path::Path;

pub fn run_settings(args: SettingsArgs, workspace: &Path) -> CliResult<()> {
    let mut settings = load_settings(workspace);

    if args.has_changes() {
        apply_changes(&mut settings, args);
        settings.ensure_dirs()?;
        let path = settings_path(workspace);
        settings.save(&path)?;
        terminal::print_success(&format!("Saved settings to {}", path.display()));
    }

    terminal::print_section("Settings");
    terminal::print_status("Projects", &settings.project_dir.display().to_string(), false);
    terminal::print_status("Exports", &settings.export_dir.display().to_string(), false);
    let ffmpeg = settings
        .ffmpeg_path
        .as_ref()
        .map_or_else(|| "ffmpeg (PATH)".to_string(), |p| p.display().to_string());
    terminal::print_status("ffmpeg", &ffmpeg, false);
    Ok(())
}

fn apply_changes(settings: &mut Settings, args: SettingsArgs) {
    if let Some(dir) = args.project_dir {
        settings.project_dir = dir;
    }
    if let Some(dir) = args.export_dir {
        settings.export_dir = dir;
    }
    if let Some(ffmpeg) = args.ffmpeg {
        settings.ffmpeg_path = Some(ffmpeg);
    }
}
