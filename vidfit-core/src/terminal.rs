//! Terminal UI components and styling for vidfit.
//!
//! Consistent, hierarchical console output routed through the `log` facade:
//! section headers, key-value status lines, success and warning markers.
//! Color is disabled when `NO_COLOR` is set.

use console::style;
use log::info;
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

/// Represents the visual hierarchy levels in the CLI output
#[derive(Debug, Clone, Copy)]
pub enum OutputLevel {
    /// Subsections and major operations (» Operation)
    Subsection,
    /// Key-value status information
    Status,
}

impl OutputLevel {
    /// Get the indentation for this output level
    fn indent(self) -> &'static str {
        match self {
            OutputLevel::Subsection => "  ",
            OutputLevel::Status => "      ",
        }
    }
}

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    info!("");
    if should_use_color() {
        info!("===== {} =====", title.to_uppercase().cyan());
    } else {
        info!("===== {} =====", title.to_uppercase());
    }
    info!("");
}

/// Print an item at the specified hierarchy level
pub fn print_item(level: OutputLevel, symbol: Option<&str>, text: &str, bold: bool) {
    let indent = level.indent();
    let symbol = symbol.map(|s| format!("{s} ")).unwrap_or_default();

    if should_use_color() && bold {
        info!("{indent}{symbol}{}", style(text).bold());
    } else {
        info!("{indent}{symbol}{text}");
    }
}

/// Print a subsection or processing step
pub fn print_processing(message: &str) {
    info!("");
    print_item(OutputLevel::Subsection, Some("»"), message, true);
}

/// Print a status line (key-value pair)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let label_width: usize = 15;
    let padding = label_width.saturating_sub(label.width()).max(1);
    let indent = OutputLevel::Status.indent();

    if should_use_color() && highlight {
        info!("{indent}{label}:{} {}", " ".repeat(padding), value.bold());
    } else {
        info!("{indent}{label}:{} {value}", " ".repeat(padding));
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    if should_use_color() {
        info!("  ✓ {}", message.green());
    } else {
        info!("  ✓ {message}");
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    if should_use_color() {
        info!("  ⚠ {}", message.yellow());
    } else {
        info!("  ⚠ {message}");
    }
}
