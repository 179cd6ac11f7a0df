// ============================================================================
// splice-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Compiler Constants and Persisted Settings
//
// This module defines the numeric constants the timeline compiler is tuned
// with, and the `Settings` structure persisted between runs (project and
// export directories, optional ffmpeg override).
//
// USAGE:
// Settings are loaded by consumers of the library (like splice-cli) with
// `Settings::load_or_default` and passed to the export orchestrator.

use crate::error::CoreResult;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// COMPILER CONSTANTS
// ============================================================================

/// Gaps shorter than this (seconds) never produce a filler segment.
pub const GAP_EPSILON: f64 = 0.01;

/// Speeds within this distance of 1.0 are treated as unity.
pub const SPEED_EPSILON: f64 = 0.001;

/// Lower bound of a single `atempo` stage.
pub const ATEMPO_MIN: f64 = 0.5;

/// Upper bound of a single `atempo` stage.
pub const ATEMPO_MAX: f64 = 2.0;

/// Frame rate of synthesized filler video.
pub const FILLER_FRAME_RATE: u32 = 30;

/// Canonical resolution used when no video clip reports dimensions.
pub const FALLBACK_WIDTH: u32 = 1920;
pub const FALLBACK_HEIGHT: u32 = 1080;

/// Volume percentage treated as unity gain.
pub const UNITY_VOLUME: f64 = 100.0;

/// Highest progress percentage reported before the engine exits.
pub const PROGRESS_CAP_RUNNING: f64 = 99.0;

/// Number of trailing diagnostic lines kept for failure reports.
pub const DIAGNOSTIC_TAIL_LINES: usize = 20;

/// Maximum characters of the diagnostic tail shown to the user.
pub const FAILURE_EXCERPT_CHARS: usize = 200;

/// Codecs reported as video streams that are really embedded cover art.
pub const ATTACHED_PICTURE_CODECS: &[&str] = &["mjpeg", "png"];

/// File name of the persisted settings document.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Sub-directory of the workspace holding saved projects.
pub const PROJECTS_DIR_NAME: &str = "_projects";

// ============================================================================
// SETTINGS
// ============================================================================

/// User settings persisted as JSON next to the workspace.
///
/// Unknown or missing keys fall back to the defaults derived from the
/// workspace directory, so older settings files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Directory where `.spliceproj` files are saved and listed.
    pub project_dir: PathBuf,

    /// Directory where exported media is written.
    pub export_dir: PathBuf,

    /// Optional explicit ffmpeg executable; `None` uses the one on `PATH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ffmpeg_path: Option<PathBuf>,
}

impl Settings {
    /// Default settings rooted at `workspace`.
    #[must_use]
    pub fn defaults_for(workspace: &Path) -> Self {
        Self {
            project_dir: workspace.join(PROJECTS_DIR_NAME),
            export_dir: workspace.to_path_buf(),
            ffmpeg_path: None,
        }
    }

    /// Loads settings from `path`, overlaying them on the workspace defaults.
    ///
    /// A missing or unreadable file yields the defaults; the failure is logged
    /// rather than returned because settings are never required to export.
    #[must_use]
    pub fn load_or_default(path: &Path, workspace: &Path) -> Self {
        let defaults = Self::defaults_for(workspace);
        if !path.exists() {
            return defaults;
        }

        let overlay = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| {
                serde_json::from_str::<SettingsOverlay>(&text).map_err(|e| e.to_string())
            });

        match overlay {
            Ok(overlay) => overlay.apply(defaults),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable settings file {}: {}",
                    path.display(),
                    e
                );
                defaults
            }
        }
    }

    /// Writes the settings as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Creates the project and export directories if they do not exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        fs::create_dir_all(&self.project_dir)?;
        fs::create_dir_all(&self.export_dir)?;
        Ok(())
    }
}

/// Partial settings as found on disk; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsOverlay {
    project_dir: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    ffmpeg_path: Option<PathBuf>,
}

impl SettingsOverlay {
    fn apply(self, mut base: Settings) -> Settings {
        // Blank paths in the file mean "keep the default".
        let non_empty = |p: PathBuf| (!p.as_os_str().is_empty()).then_some(p);
        if let Some(dir) = self.project_dir.and_then(non_empty) {
            base.project_dir = dir;
        }
        if let Some(dir) = self.export_dir.and_then(non_empty) {
            base.export_dir = dir;
        }
        if let Some(ffmpeg) = self.ffmpeg_path.and_then(non_empty) {
            base.ffmpeg_path = Some(ffmpeg);
        }
        base
    }
}
