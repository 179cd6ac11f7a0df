//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of one subcommand. Every
//! command receives the workspace directory, from which the persisted
//! settings are loaded.

pub mod export;
pub mod graph;
pub mod probe;
pub mod projects;
pub mod settings;

use splice_core::Settings;
use splice_core::config::SETTINGS_FILE_NAME;
use std::path::{Path, PathBuf};

/// Location of the settings file inside `workspace`.
#[must_use]
pub fn settings_path(workspace: &Path) -> PathBuf {
    workspace.join(SETTINGS_FILE_NAME)
}

/// Loads the workspace settings, falling back to the defaults.
#[must_use]
pub fn load_settings(workspace: &Path) -> Settings {
    Settings::load_or_default(&settings_path(workspace), workspace)
}
