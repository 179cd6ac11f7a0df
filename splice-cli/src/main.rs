//! Main entry point for the Splice CLI application.
//!
//! This handles command-line argument parsing, logging setup, and dispatching
//! to the appropriate command handlers.

use clap::Parser;
use splice_cli::logging::init_logging;
use splice_cli::terminal::print_error;
use splice_cli::{
    Cli, Commands, run_export, run_graph, run_probe, run_projects, run_settings,
};
use std::process;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    log::debug!("Workspace: {}", cli.workspace.display());

    let workspace = cli.workspace;
    let result = match cli.command {
        Commands::Probe(args) => run_probe(args, &workspace),
        Commands::Graph(args) => run_graph(args),
        Commands::Export(args) => run_export(args, &workspace),
        Commands::Projects => run_projects(&workspace),
        Commands::Settings(args) => run_settings(args, &workspace),
    };

    if let Err(e) = result {
        log::debug!("Command failed: {e:?}");
        print_error(&e.to_string());
        process::exit(1);
    }
}
