// splice-cli/src/commands/graph.rs
//
// The `graph` command: compiles a saved project and prints the resulting
// inputs and filter chains without running ffmpeg.

use crate::cli::{GraphArgs, TimelineArgs};
use crate::error::CliResult;
use crate::terminal;

use splice_core::{CompiledTimeline, LoadedProject, Timeline, compile, format_duration, load_project};

/// Opens the project named by `args` and applies the command-line overrides.
pub fn open_timeline(args: &TimelineArgs) -> CliResult<(LoadedProject, Timeline)> {
    let project = load_project(&args.project)?;
    for name in &project.missing {
        terminal::print_warning(&format!("Media file missing: {name}"));
    }

    let mut timeline = project.timeline.clone();
    if let Some(format) = args.format {
        timeline = timeline.with_format(format);
    }
    if let Some(duration) = args.duration {
        timeline = timeline.with_duration(duration);
    }
    Ok((project, timeline))
}

pub fn run_graph(args: GraphArgs) -> CliResult<()> {
    let (project, timeline) = open_timeline(&args.timeline)?;
    let compiled = compile(&timeline, &project.catalog)?;
    print_compiled(&project.name, &compiled);
    Ok(())
}

fn print_compiled(name: &str, compiled: &CompiledTimeline) {
    terminal::print_section(&format!("Graph: {name}"));
    terminal::print_status("Duration", &format_duration(compiled.duration), true);
    if let Some(resolution) = compiled.resolution {
        terminal::print_status("Resolution", &resolution.to_string(), false);
    }
    let outputs: Vec<String> = compiled
        .output_labels()
        .iter()
        .map(|label| label.to_string())
        .collect();
    terminal::print_status("Outputs", &outputs.join(" "), false);

    terminal::print_section("Inputs");
    for (index, input) in compiled.inputs.iter().enumerate() {
        terminal::print_sub_item(&format!("{index}: {}", input.display()));
    }

    terminal::print_section("Filter chains");
    for chain in compiled.graph.chains() {
        println!("{chain}");
    }
}
