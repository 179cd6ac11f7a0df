// ============================================================================
// splice-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: Styled Console Components
//
// Terminal UI components follow a visual hierarchy:
//
// 1. Sections (===== SECTION =====) for each command's main phase
// 2. Status items (  Label:     Value) for key-value information
// 3. Sub-items (  - text) for listed details
// 4. Success, warning and error lines
//
// Color is decided by `console`, which honours NO_COLOR and non-tty output.
// Diagnostics go through `log`; this module is only for user-facing output.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SECTION_PREFIX: &str = "===== ";
const SECTION_SUFFIX: &str = " =====";
const STATUS_LABEL_WIDTH: usize = 14;

/// Print a section header for a command's main phase.
pub fn print_section(title: &str) {
    println!();
    println!(
        "{}{}{}",
        SECTION_PREFIX,
        style(title.to_uppercase()).cyan().bold(),
        SECTION_SUFFIX
    );
    println!();
}

/// Print a key-value status line; `highlight` renders the value in bold.
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let label = format!("{label}:");
    if highlight {
        println!("  {:<width$} {}", label, style(value).bold(), width = STATUS_LABEL_WIDTH);
    } else {
        println!("  {:<width$} {}", label, value, width = STATUS_LABEL_WIDTH);
    }
}

pub fn print_sub_item(message: &str) {
    println!("  - {message}");
}

/// Print a success message with a green checkmark.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), style(message).yellow());
}

/// Print an error line to stderr in the "Error: message" form.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), message);
}

/// Progress bar for an export, counting percent from 0 to 100.
pub fn export_progress_bar(label: &str) -> ProgressBar {
    let bar = ProgressBar::new(100);
    let bar_style = ProgressStyle::default_bar()
        .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos:>3}% ({elapsed_precise})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ");
    bar.set_style(bar_style);
    bar.set_message(label.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
