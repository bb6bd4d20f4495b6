//! CSV output: one row per canonical record, fixed column order.
//!
//! Absent values are empty cells; flags are `1`/`0`.

use std::io::Write;

use crate::error::AggregateResult;
use crate::models::ResearchOutput;

type Cell = fn(&ResearchOutput) -> String;

/// Column headers and their cell renderers, in output order.
pub const COLUMNS: &[(&str, Cell)] = &[
    ("doi", |r| text(r.doi.as_deref())),
    ("clientId", |r| text(r.client_id.as_deref())),
    ("publicationYear", |r| number(r.publication_year)),
    ("resourceType", |r| text(r.resource_type.as_deref())),
    ("title", |r| text(r.title.as_deref())),
    ("publisher", |r| text(r.publisher.as_deref())),
    ("createdAt", |r| text(r.created_at.as_deref())),
    ("updatedAt", |r| text(r.updated_at.as_deref())),
    ("isPublisher", |r| flag(r.is_publisher)),
    ("isFunder", |r| flag(r.is_funder)),
    ("haveCreatorAffiliation", |r| flag(r.have_creator_affiliation)),
    ("haveContributorAffiliation", |r| flag(r.have_contributor_affiliation)),
    ("isLatestVersion", |r| flag(r.is_latest_version)),
    ("isConceptDoi", |r| flag(r.is_concept_doi)),
    ("matchPublisherRor", |r| flag(r.match_publisher_ror)),
    ("matchCreatorAffiliationRor", |r| flag(r.match_creator_affiliation_ror)),
    ("matchContributorAffiliationRor", |r| flag(r.match_contributor_affiliation_ror)),
    ("matchFunderRor", |r| flag(r.match_funder_ror)),
    ("matchPublisherName", |r| flag(r.match_publisher_name)),
    ("matchCreatorName", |r| flag(r.match_creator_name)),
    ("matchContributorName", |r| flag(r.match_contributor_name)),
    ("matchFunderName", |r| flag(r.match_funder_name)),
    ("inDataCite", |r| flag(r.in_datacite)),
    ("inOpenAire", |r| flag(r.in_openaire)),
    ("inOpenAlex", |r| flag(r.in_openalex)),
    ("openAireBestAccessRight", |r| text(r.openaire_best_access_right.as_deref())),
    ("openAireIndicatorsUsageCountsDownloads", |r| number(r.openaire_downloads)),
    ("openAireIndicatorsUsageCountsViews", |r| number(r.openaire_views)),
    ("openAireId", |r| text(r.openaire_id.as_deref())),
    ("openAlexId", |r| text(r.openalex_id.as_deref())),
    ("openAlexCitedByCount", |r| number(r.openalex_cited_by_count)),
    ("openAlexReferencedWorksCount", |r| number(r.openalex_referenced_works_count)),
    ("titleWordCount", |r| number(r.title_word_count)),
];

fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn number<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "1".to_string(),
        Some(false) => "0".to_string(),
        None => String::new(),
    }
}

/// Write records as CSV with a header row.
///
/// # Errors
///
/// Returns error if the writer fails.
pub fn write_csv<W: Write>(records: &[ResearchOutput], writer: W) -> AggregateResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(COLUMNS.iter().map(|(name, _)| *name))?;

    for record in records {
        csv.write_record(COLUMNS.iter().map(|(_, cell)| cell(record)))?;
    }

    csv.flush()?;
    Ok(())
}

/// Format records as a CSV string.
///
/// # Errors
///
/// Returns error if serialization fails.
pub fn format_csv(records: &[ResearchOutput]) -> AggregateResult<String> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_matches_columns() {
        let csv = format_csv(&[]).unwrap();
        let header = csv.lines().next().unwrap();
        assert!(header.starts_with("doi,clientId,publicationYear"));
        assert_eq!(header.split(',').count(), COLUMNS.len());
    }

    #[test]
    fn test_flags_and_absent_values() {
        let record = ResearchOutput {
            doi: Some("10.5878/abc".into()),
            is_publisher: Some(true),
            have_creator_affiliation: Some(false),
            title: Some("Survey, 2021".into()),
            ..ResearchOutput::default()
        };
        let csv = format_csv(&[record]).unwrap();
        let row = csv.lines().nth(1).unwrap();

        let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(row.as_bytes());
        let cells = reader.records().next().unwrap().unwrap();
        let cell = |name: &str| {
            let i = COLUMNS.iter().position(|(n, _)| *n == name).unwrap();
            cells.get(i).unwrap().to_string()
        };

        assert_eq!(cell("doi"), "10.5878/abc");
        assert_eq!(cell("title"), "Survey, 2021");
        assert_eq!(cell("isPublisher"), "1");
        assert_eq!(cell("haveCreatorAffiliation"), "0");
        assert_eq!(cell("haveContributorAffiliation"), "");
        assert_eq!(cell("openAlexCitedByCount"), "");
    }
}
