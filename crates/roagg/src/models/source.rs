//! Registry-neutral view of one raw record.
//!
//! Every registry parser reduces its native JSON to a [`SourceRecord`]. Facets a
//! registry does not report at all are `None`; facets it reports but that are
//! empty for this record are `Some(vec![])`. The matcher relies on that
//! distinction to leave unreported flags absent instead of false.

use serde::{Deserialize, Serialize};

use super::Registry;

/// An affiliation reference on a contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    /// Free-text organization name.
    pub name: Option<String>,
    /// Persistent organization identifier.
    pub identifier: Option<String>,
}

impl Affiliation {
    /// Affiliation known only by name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: Some(name.into()), identifier: None }
    }
}

/// A person or entity attached to an output in one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// Display name.
    pub name: Option<String>,
    /// Affiliation references.
    pub affiliations: Vec<Affiliation>,
    /// Identifiers attached directly to the contributor (ORCID, ROR ...).
    pub identifiers: Vec<String>,
}

/// A single organization-like party: publisher or funder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Display name.
    pub name: Option<String>,
    /// Persistent identifier.
    pub identifier: Option<String>,
}

/// Registry-specific enrichment values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    /// OpenAIRE best access right label (e.g. "OPEN").
    pub openaire_best_access_right: Option<String>,
    /// OpenAIRE download counter.
    pub openaire_downloads: Option<u64>,
    /// OpenAIRE view counter.
    pub openaire_views: Option<u64>,
    /// OpenAIRE research product id.
    pub openaire_id: Option<String>,
    /// OpenAlex work id.
    pub openalex_id: Option<String>,
    /// OpenAlex cited-by counter.
    pub openalex_cited_by_count: Option<u64>,
    /// OpenAlex referenced-works counter.
    pub openalex_referenced_works_count: Option<u64>,
}

/// One raw record after typed parsing.
#[derive(Debug, Clone, Default)]
pub struct SourceRecord {
    /// Registry the record came from.
    pub registry: Registry,
    /// Candidate DOIs, bare and deduplicated, in registry order.
    pub dois: Vec<String>,
    /// Registry client / repository id.
    pub client_id: Option<String>,
    /// Publication year.
    pub publication_year: Option<i32>,
    /// Resource type.
    pub resource_type: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Publisher, when the registry reports one.
    pub publisher: Option<Agent>,
    /// Creators; `None` if the registry has no creator facet.
    pub creators: Option<Vec<Contributor>>,
    /// Contributors; `None` if the registry has no contributor facet.
    pub contributors: Option<Vec<Contributor>>,
    /// Funders; `None` if the registry has no funding facet.
    pub funders: Option<Vec<Agent>>,
    /// Number of versions derived from this record.
    pub version_count: Option<u32>,
    /// Number of records this one is a version of.
    pub version_of_count: Option<u32>,
    /// A "newer version exists" relation was observed.
    pub superseded: bool,
    /// Whether the registry reports version relations at all.
    pub reports_versions: bool,
    /// Creation timestamp.
    pub created_at: Option<String>,
    /// Last update timestamp.
    pub updated_at: Option<String>,
    /// Registry-specific counters and ids.
    pub enrichment: Enrichment,
}

impl SourceRecord {
    /// Empty record for a registry.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self { registry, ..Default::default() }
    }

    /// First candidate DOI.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        self.dois.first().map(String::as_str)
    }

    /// Concept DOI rule: has versions and is not itself a version.
    ///
    /// `None` when the registry does not report version counts.
    #[must_use]
    pub fn is_concept_doi(&self) -> Option<bool> {
        self.reports_versions.then(|| {
            self.version_count.unwrap_or(0) > 0 && self.version_of_count.unwrap_or(0) == 0
        })
    }

    /// Latest-version rule: true unless a newer-version relation was seen.
    ///
    /// `None` when the registry does not report version relations.
    #[must_use]
    pub fn is_latest_version(&self) -> Option<bool> {
        self.reports_versions.then_some(!self.superseded)
    }
}
