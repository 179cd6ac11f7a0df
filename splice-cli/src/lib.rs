// splice-cli/src/lib.rs
//
// Library portion of the Splice CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands};
pub use commands::export::run_export;
pub use commands::graph::run_graph;
pub use commands::probe::run_probe;
pub use commands::projects::run_projects;
pub use commands::settings::run_settings;
