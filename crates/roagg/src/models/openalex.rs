//! OpenAlex `works` records.

use serde::Deserialize;

use super::lenient;
use super::openaire::year_from_date;
use super::{Affiliation, Contributor, Enrichment, Registry, SourceRecord};
use crate::doi;

/// An OpenAlex work.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Work {
    /// OpenAlex id (`https://openalex.org/W...`).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,

    /// DOI as a resolver URL.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub doi: Option<String>,

    /// Title.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,

    /// Work type ("dataset", "article" ...).
    #[serde(default, rename = "type", deserialize_with = "lenient::opt_string")]
    pub work_type: Option<String>,

    /// Publication year.
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    pub publication_year: Option<i32>,

    /// Publication date (`YYYY-MM-DD`).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub publication_date: Option<String>,

    /// Authorships with institutions.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub authorships: Vec<Authorship>,

    /// Times cited.
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub cited_by_count: Option<u64>,

    /// Outgoing references.
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub referenced_works_count: Option<u64>,

    /// Record creation date.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created_date: Option<String>,

    /// Record update date.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub updated_date: Option<String>,
}

/// One authorship.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Authorship {
    /// The author.
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    pub author: Option<Author>,

    /// Resolved institutions.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub institutions: Vec<Institution>,

    /// Affiliation strings as printed.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub raw_affiliation_strings: Vec<Option<String>>,
}

/// Author of an authorship.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Author {
    /// Display name.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_name: Option<String>,

    /// ORCID URL.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub orcid: Option<String>,
}

/// A resolved institution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Institution {
    /// Display name.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub display_name: Option<String>,

    /// ROR URL.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ror: Option<String>,
}

impl From<Authorship> for Contributor {
    fn from(authorship: Authorship) -> Self {
        let author = authorship.author.unwrap_or_default();

        let affiliations = authorship
            .institutions
            .into_iter()
            .map(|i| Affiliation { name: i.display_name, identifier: i.ror })
            .chain(authorship.raw_affiliation_strings.into_iter().flatten().map(Affiliation::named))
            .collect();

        Self {
            name: author.display_name,
            affiliations,
            identifiers: author.orcid.into_iter().collect(),
        }
    }
}

/// Parse one OpenAlex work.
pub fn parse(raw: &serde_json::Value) -> Result<SourceRecord, serde_json::Error> {
    let work = Work::deserialize(raw)?;

    let publication_year = work
        .publication_date
        .as_deref()
        .and_then(year_from_date)
        .or(work.publication_year);

    Ok(SourceRecord {
        registry: Registry::OpenAlex,
        dois: work.doi.as_deref().and_then(doi::strip_resolver_prefix).into_iter().collect(),
        publication_year,
        resource_type: work.work_type,
        title: work.title,
        creators: Some(work.authorships.into_iter().map(Contributor::from).collect()),
        created_at: work.created_date,
        updated_at: work.updated_date,
        enrichment: Enrichment {
            openalex_id: work.id,
            openalex_cited_by_count: work.cited_by_count,
            openalex_referenced_works_count: work.referenced_works_count,
            ..Enrichment::default()
        },
        ..SourceRecord::new(Registry::OpenAlex)
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_work() {
        let raw = json!({
            "id": "https://openalex.org/W123",
            "doi": "https://doi.org/10.5878/abc",
            "title": "Household survey",
            "type": "dataset",
            "publication_year": 2020,
            "publication_date": "2021-02-03",
            "cited_by_count": 5,
            "referenced_works_count": 0,
            "authorships": [{
                "author": {"display_name": "Jane Doe", "orcid": "https://orcid.org/0000-0001"},
                "institutions": [{"display_name": "Lund University", "ror": "https://ror.org/012a77v79"}],
                "raw_affiliation_strings": ["Dept. of Economics, Lund University"]
            }]
        });

        let record = parse(&raw).unwrap();
        assert_eq!(record.dois, vec!["10.5878/abc"]);
        assert_eq!(record.publication_year, Some(2021));
        assert_eq!(record.enrichment.openalex_cited_by_count, Some(5));
        assert_eq!(record.enrichment.openalex_id.as_deref(), Some("https://openalex.org/W123"));
        assert!(record.publisher.is_none());
        assert!(record.contributors.is_none());

        let creators = record.creators.unwrap();
        assert_eq!(creators[0].affiliations.len(), 2);
        assert_eq!(creators[0].identifiers, vec!["https://orcid.org/0000-0001"]);
    }

    #[test]
    fn test_parse_work_without_doi() {
        let record = parse(&json!({"id": "https://openalex.org/W9", "doi": null})).unwrap();
        assert!(record.dois.is_empty());
        assert_eq!(record.creators, Some(vec![]));
    }
}
