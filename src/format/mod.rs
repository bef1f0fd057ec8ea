//! Output formatting: the RSS document and the run summary (text, JSON).

pub mod xml;

use crate::config::OutputFormat;
use crate::feed::RunSummary;

pub use xml::render_feed;

/// Formats run summaries for the terminal.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a run summary.
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Json => self.json_summary(summary),
            OutputFormat::Text => self.text_summary(summary),
        }
    }

    fn json_summary(&self, summary: &RunSummary) -> String {
        serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
    }

    fn text_summary(&self, summary: &RunSummary) -> String {
        let id_width = summary.included.iter().map(|p| p.id.len()).max().unwrap_or(2).max(2);

        let mut lines = Vec::new();

        lines.push(format!("Source items:  {}", summary.total_items));
        lines.push(format!("Included:      {}", summary.included_count()));
        lines.push(format!("Output:        {}", summary.output_path.display()));
        lines.push(format!("Publish:       {}", summary.publish));

        if !summary.included.is_empty() {
            lines.push(String::new());
            lines.push(format!("{:<id_width$}  {}", "ID", "Title"));
            lines.push(format!("{:-<id_width$}  {:-<40}", "", ""));

            for product in &summary.included {
                lines.push(format!("{:<id_width$}  {}", product.id, product.title));
            }
        }

        lines.join("\n")
    }
}
