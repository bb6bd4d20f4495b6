//! JSON output: an array of canonical records, absent fields omitted.

use crate::error::AggregateResult;
use crate::models::ResearchOutput;

/// Format records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn format_json(records: &[ResearchOutput]) -> AggregateResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
