// ============================================================================
// splice-core/src/project.rs
// ============================================================================
//
// PROJECT PERSISTENCE: Saving and Reopening Timelines
//
// A project file (`<name>.spliceproj`) is a versioned JSON document holding a
// timeline and the catalog entries its clips reference. Loading restores the
// entries whose media still exists on disk and reports the others by name, so
// a project with moved media can still be opened and repaired.

use crate::catalog::MediaCatalog;
use crate::error::{CoreError, CoreResult};
use crate::timeline::{FileId, MediaAsset, Timeline};
use crate::utils::get_filename_safe;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Current project document version.
pub const PROJECT_VERSION: u32 = 1;

/// File extension of project documents.
pub const PROJECT_EXTENSION: &str = "spliceproj";

/// On-disk project document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    /// Catalog entries referenced by the clips.
    #[serde(default)]
    pub files: BTreeMap<FileId, MediaAsset>,
    #[serde(flatten)]
    pub timeline: Timeline,
    /// Number of tracks shown by the editor.
    #[serde(default = "default_tracks")]
    pub tracks: u32,
}

fn default_tracks() -> u32 {
    1
}

impl Project {
    /// Captures `timeline` and the catalog entries it references.
    ///
    /// Clips pointing at ids missing from the catalog are kept; they are
    /// reported when the timeline is compiled.
    #[must_use]
    pub fn capture(name: &str, timeline: &Timeline, catalog: &MediaCatalog) -> Self {
        let files = timeline
            .clips
            .iter()
            .filter_map(|clip| catalog.get(&clip.file_id))
            .map(|asset| (asset.id.clone(), asset.clone()))
            .collect();
        let tracks = timeline
            .clips
            .iter()
            .map(|clip| clip.track + 1)
            .max()
            .unwrap_or(1);

        Self {
            version: PROJECT_VERSION,
            name: name.trim().to_string(),
            saved_at: Utc::now(),
            files,
            timeline: timeline.clone(),
            tracks,
        }
    }
}

/// Result of opening a project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub name: String,
    pub timeline: Timeline,
    pub tracks: u32,
    /// Entries whose media file still exists.
    pub catalog: MediaCatalog,
    /// Display names of entries whose media file is gone.
    pub missing: Vec<String>,
}

/// Listing entry for a saved project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    pub filename: String,
    pub tracks: u32,
    pub clips: usize,
    pub files: usize,
}

/// Writes `project` into `dir` as `<name>.spliceproj` and returns the path.
pub fn save_project(project: &Project, dir: &Path) -> CoreResult<PathBuf> {
    let name = project.name.trim();
    if name.is_empty() || name.contains(['/', '\\']) {
        return Err(CoreError::PathError(format!(
            "'{}' is not usable as a project file name",
            project.name
        )));
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.{PROJECT_EXTENSION}"));
    fs::write(&path, serde_json::to_string_pretty(project)?)?;
    log::info!(
        "Saved project '{}' ({} clip(s), {} file(s)) to {}",
        name,
        project.timeline.clips.len(),
        project.files.len(),
        path.display()
    );
    Ok(path)
}

/// Reads a project document without checking its media.
pub fn read_project(path: &Path) -> CoreResult<Project> {
    let text = fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&text)?;
    if project.version != PROJECT_VERSION {
        return Err(CoreError::ProjectVersion(project.version));
    }
    Ok(project)
}

/// Opens a project, restoring the catalog entries whose media still exists.
pub fn load_project(path: &Path) -> CoreResult<LoadedProject> {
    let project = read_project(path)?;

    let mut catalog = MediaCatalog::new();
    let mut missing = Vec::new();
    for asset in project.files.into_values() {
        if asset.path.exists() {
            catalog.insert(asset);
        } else {
            log::warn!(
                "Project media missing: {} ({})",
                asset.name,
                asset.path.display()
            );
            missing.push(asset.name);
        }
    }

    log::info!(
        "Opened project '{}': {} file(s) restored, {} missing",
        project.name,
        catalog.len(),
        missing.len()
    );

    Ok(LoadedProject {
        name: project.name,
        timeline: project.timeline,
        tracks: project.tracks,
        catalog,
        missing,
    })
}

/// Summaries of the readable projects in `dir`, sorted by file name.
///
/// A missing directory lists as empty; unreadable documents are skipped.
pub fn list_projects(dir: &Path) -> CoreResult<Vec<ProjectSummary>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut summaries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(PROJECT_EXTENSION) {
            continue;
        }
        match read_project(&path) {
            Ok(project) => summaries.push(ProjectSummary {
                name: project.name,
                filename: get_filename_safe(&path)?,
                tracks: project.tracks,
                clips: project.timeline.clips.len(),
                files: project.files.len(),
            }),
            Err(e) => log::warn!("Skipping unreadable project {}: {}", path.display(), e),
        }
    }
    summaries.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(summaries)
}
