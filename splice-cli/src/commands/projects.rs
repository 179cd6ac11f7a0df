// splice-cli/src/commands/projects.rs
//
// The `projects` command: lists the projects saved in the project directory.

use crate::commands::load_settings;
use crate::error::CliResult;
use crate::terminal;

use splice_core::list_projects;
use std::path::Path;

pub fn run_projects(workspace: &Path) -> CliResult<()> {
    let settings = load_settings(workspace);
    let projects = list_projects(&settings.project_dir)?;

    terminal::print_section("Projects");
    terminal::print_status("Directory", &settings.project_dir.display().to_string(), false);
    if projects.is_empty() {
        println!("  No saved projects.");
        return Ok(());
    }

    for project in &projects {
        terminal::print_sub_item(&format!(
            "{} ({}): {} clip(s), {} file(s), {} track(s)",
            project.name, project.filename, project.clips, project.files, project.tracks
        ));
    }
    Ok(())
}
