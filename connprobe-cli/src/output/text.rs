//! Text output formatting with colors.

use connprobe_core::ProbeOutcome;
use connprobe_probers::KindDescriptor;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

const NAME_WIDTH: usize = 12;
const BACKEND_WIDTH: usize = 22;
const SQL_TAG: &str = "(sql)";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats a probe outcome: `✓ [200] message`.
    pub fn format_outcome(&self, outcome: &ProbeOutcome) -> String {
        let marker = if outcome.is_success() { "✓" } else { "✗" };
        let status = format!("{marker} [{}]", outcome.status_code);
        format!("{} {}", self.color_for_status(outcome.status_code, &status), outcome.message)
    }

    /// Formats the kind list header.
    pub fn format_kinds_header(&self) -> String {
        format!(
            "{} {} {}",
            self.bold(&format!("{:<NAME_WIDTH$}", "Kind")),
            self.bold(&format!("{:<BACKEND_WIDTH$}", "Backend")),
            self.bold("Connection")
        )
    }

    /// Formats a single kind line.
    pub fn format_kind_line(&self, desc: &KindDescriptor) -> String {
        // Pad on the plain text; escape codes have no width.
        let backend = if desc.is_sql_driver {
            let plain = format!("{} {SQL_TAG}", desc.display_name);
            let fill = BACKEND_WIDTH.saturating_sub(plain.chars().count());
            format!("{} {}{}", desc.display_name, self.dim(SQL_TAG), " ".repeat(fill))
        } else {
            format!("{:<BACKEND_WIDTH$}", desc.display_name)
        };
        format!("{:<NAME_WIDTH$} {backend} {}", desc.name, desc.connection_hint)
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_status(&self, status: u16, text: &str) -> String {
        match status {
            200..=299 => self.paint(GREEN, text),
            400..=499 => self.paint(YELLOW, text),
            _ => self.paint(RED, text),
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn paint(&self, style: &str, text: &str) -> String {
        if self.use_colors {
            format!("{style}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
