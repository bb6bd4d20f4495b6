//! Output formatters for CSV, JSON and Markdown.

mod csv;
mod json;
mod markdown;

pub use self::csv::{COLUMNS, format_csv, write_csv};
pub use self::json::format_json;
pub use markdown::format_summary_markdown;

use crate::error::AggregateResult;
use crate::resolve::Resolution;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One row per record.
    #[default]
    Csv,
    /// Array of records.
    Json,
    /// Run summary.
    Markdown,
}

/// Render a resolution in the requested format.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn render(format: OutputFormat, resolution: &Resolution) -> AggregateResult<String> {
    match format {
        OutputFormat::Csv => format_csv(&resolution.records),
        OutputFormat::Json => format_json(&resolution.records),
        OutputFormat::Markdown => Ok(format_summary_markdown(resolution)),
    }
}
