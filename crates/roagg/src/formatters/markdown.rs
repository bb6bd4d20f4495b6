//! Markdown run summary.

use crate::models::{Registry, ResearchOutput};
use crate::resolve::Resolution;

/// Summarize a resolution as Markdown.
#[must_use]
pub fn format_summary_markdown(resolution: &Resolution) -> String {
    let records = &resolution.records;
    if records.is_empty() {
        return "No research outputs found.".to_string();
    }

    let mut output = format!("# Research outputs ({} records)\n\n", records.len());

    output.push_str("## Registries\n\n");
    output.push_str("| Registry | Received | Unparsed | Without DOI | Merged | Appended | Records |\n");
    output.push_str("|---|---:|---:|---:|---:|---:|---:|\n");
    for batch in &resolution.batches {
        let (merged, appended) = batch
            .merge
            .map_or(("-".to_string(), "-".to_string()), |m| {
                (m.merged.to_string(), m.appended.to_string())
            });
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            batch.registry,
            batch.received,
            batch.unparsed,
            batch.without_doi,
            merged,
            appended,
            count(records, |r| r.in_registry(batch.registry)),
        ));
    }

    output.push_str("\n## Evidence\n\n");
    output.push_str("| Flag | Records |\n|---|---:|\n");
    let flags: [(&str, fn(&ResearchOutput) -> Option<bool>); 6] = [
        ("isPublisher", |r| r.is_publisher),
        ("haveCreatorAffiliation", |r| r.have_creator_affiliation),
        ("haveContributorAffiliation", |r| r.have_contributor_affiliation),
        ("isFunder", |r| r.is_funder),
        ("isLatestVersion", |r| r.is_latest_version),
        ("isConceptDoi", |r| r.is_concept_doi),
    ];
    for (name, get) in flags {
        output.push_str(&format!("| {name} | {} |\n", count(records, |r| get(r) == Some(true))));
    }

    let without_doi = count(records, |r| r.doi.is_none());
    if without_doi > 0 {
        output.push_str(&format!("\n**Without DOI**: {without_doi}\n"));
    }

    if let Some(primary) = resolution.batches.first().map(|b| b.registry) {
        let only_secondary = count(records, |r| {
            !r.in_registry(primary)
                && Registry::ALL.iter().any(|&other| other != primary && r.in_registry(other))
        });
        if only_secondary > 0 {
            output.push_str(&format!("\n**Not in {primary}**: {only_secondary}\n"));
        }
    }

    output
}

fn count(records: &[ResearchOutput], predicate: impl Fn(&ResearchOutput) -> bool) -> usize {
    records.iter().filter(|r| predicate(r)).count()
}
