//! Human-readable summary of a single comparison unit.

use super::csv::{format_score, package_header};
use crate::pipeline::{Cell, UnitOutcome};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    /// Render one unit: every column of its table row, then the audited items.
    #[must_use]
    pub fn render(&self, outcome: &UnitOutcome) -> String {
        let context = &outcome.context;
        let mut lines = vec![
            self.color("SBOM Consistency Summary", "bold"),
            self.color("─".repeat(40).as_str(), "dim"),
            format!(
                "{}  {} ({}) {} vs {}",
                self.color("Unit:", "cyan"),
                context.repository,
                context.standard,
                context.tool1,
                context.tool2
            ),
            String::new(),
        ];

        let header = package_header(context.standard);
        let width = header.iter().map(String::len).max().unwrap_or(0);
        for (column, cell) in header.iter().skip(1).zip(&outcome.row.cells) {
            let value = match cell {
                Cell::Count(n) => n.to_string(),
                Cell::Score(s) => format_score(*s),
            };
            lines.push(format!("  {column:<width$}  {value}"));
        }

        if !outcome.audits.is_empty() {
            lines.push(String::new());
            lines.push(self.color(
                &format!("Items with both-empty fields: {}", outcome.audits.len()),
                "yellow",
            ));
            for audit in &outcome.audits {
                let scores: Vec<String> = audit.scores.iter().map(|s| format_score(*s)).collect();
                lines.push(format!("  {}  [{}]", audit.item_name, scores.join(", ")));
            }
        }

        lines.join("\n")
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}
