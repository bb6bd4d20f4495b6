//! Canonical output records and the deltas merged into them.

use serde::{Deserialize, Serialize};

use super::{Registry, SourceRecord};
use crate::doi::DoiKey;
use crate::matching::MatchEvidence;

/// One research output, merged across registries.
///
/// Every attribute is optional: `None` means no registry has reported it yet,
/// which is different from a reported `false` or `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchOutput {
    /// DOI, in the spelling first seen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// Registry client / repository id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    /// Publication year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_year: Option<i32>,

    /// Resource type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// Title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Publisher name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    /// Registry creation timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Registry update timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// The organization is the publisher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_publisher: Option<bool>,

    /// The organization is a funder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_funder: Option<bool>,

    /// A creator is affiliated with the organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub have_creator_affiliation: Option<bool>,

    /// A contributor is affiliated with the organization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub have_contributor_affiliation: Option<bool>,

    /// No newer version is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_latest_version: Option<bool>,

    /// The DOI is a concept DOI (has versions, is not one).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_concept_doi: Option<bool>,

    /// Publisher matched by identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_publisher_ror: Option<bool>,

    /// A creator matched by identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_creator_affiliation_ror: Option<bool>,

    /// A contributor matched by identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_contributor_affiliation_ror: Option<bool>,

    /// A funder matched by identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_funder_ror: Option<bool>,

    /// Publisher matched by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_publisher_name: Option<bool>,

    /// A creator matched by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_creator_name: Option<bool>,

    /// A contributor matched by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_contributor_name: Option<bool>,

    /// A funder matched by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_funder_name: Option<bool>,

    /// Reported by DataCite.
    #[serde(rename = "inDataCite", skip_serializing_if = "Option::is_none")]
    pub in_datacite: Option<bool>,

    /// Reported by OpenAIRE.
    #[serde(rename = "inOpenAire", skip_serializing_if = "Option::is_none")]
    pub in_openaire: Option<bool>,

    /// Reported by OpenAlex.
    #[serde(rename = "inOpenAlex", skip_serializing_if = "Option::is_none")]
    pub in_openalex: Option<bool>,

    /// OpenAIRE best access right.
    #[serde(rename = "openAireBestAccessRight", skip_serializing_if = "Option::is_none")]
    pub openaire_best_access_right: Option<String>,

    /// OpenAIRE downloads.
    #[serde(
        rename = "openAireIndicatorsUsageCountsDownloads",
        skip_serializing_if = "Option::is_none"
    )]
    pub openaire_downloads: Option<u64>,

    /// OpenAIRE views.
    #[serde(
        rename = "openAireIndicatorsUsageCountsViews",
        skip_serializing_if = "Option::is_none"
    )]
    pub openaire_views: Option<u64>,

    /// OpenAIRE research product id.
    #[serde(rename = "openAireId", skip_serializing_if = "Option::is_none")]
    pub openaire_id: Option<String>,

    /// OpenAlex work id.
    #[serde(rename = "openAlexId", skip_serializing_if = "Option::is_none")]
    pub openalex_id: Option<String>,

    /// OpenAlex cited-by count.
    #[serde(rename = "openAlexCitedByCount", skip_serializing_if = "Option::is_none")]
    pub openalex_cited_by_count: Option<u64>,

    /// OpenAlex referenced-works count.
    #[serde(rename = "openAlexReferencedWorksCount", skip_serializing_if = "Option::is_none")]
    pub openalex_referenced_works_count: Option<u64>,

    /// Words in the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_word_count: Option<u32>,
}

impl ResearchOutput {
    /// Build a record from one classified registry record.
    ///
    /// Flags for facets the registry does not report stay absent.
    #[must_use]
    pub fn from_source(source: &SourceRecord, evidence: &MatchEvidence) -> Self {
        let by_identifier = |facet: Option<crate::matching::FacetEvidence>| facet.map(|f| f.by_identifier);
        let by_name = |facet: Option<crate::matching::FacetEvidence>| facet.map(|f| f.by_name);

        let mut output = Self {
            doi: source.doi().map(str::to_string),
            client_id: source.client_id.clone(),
            publication_year: source.publication_year,
            resource_type: source.resource_type.clone(),
            title: source.title.clone(),
            publisher: source.publisher.as_ref().and_then(|p| p.name.clone()),
            created_at: source.created_at.clone(),
            updated_at: source.updated_at.clone(),
            is_publisher: evidence.is_publisher(),
            is_funder: evidence.is_funder(),
            have_creator_affiliation: evidence.have_creator_affiliation(),
            have_contributor_affiliation: evidence.have_contributor_affiliation(),
            is_latest_version: source.is_latest_version(),
            is_concept_doi: source.is_concept_doi(),
            match_publisher_ror: by_identifier(evidence.publisher),
            match_creator_affiliation_ror: by_identifier(evidence.creators),
            match_contributor_affiliation_ror: by_identifier(evidence.contributors),
            match_funder_ror: by_identifier(evidence.funders),
            match_publisher_name: by_name(evidence.publisher),
            match_creator_name: by_name(evidence.creators),
            match_contributor_name: by_name(evidence.contributors),
            match_funder_name: by_name(evidence.funders),
            openaire_best_access_right: source.enrichment.openaire_best_access_right.clone(),
            openaire_downloads: source.enrichment.openaire_downloads,
            openaire_views: source.enrichment.openaire_views,
            openaire_id: source.enrichment.openaire_id.clone(),
            openalex_id: source.enrichment.openalex_id.clone(),
            openalex_cited_by_count: source.enrichment.openalex_cited_by_count,
            openalex_referenced_works_count: source.enrichment.openalex_referenced_works_count,
            ..Self::default()
        };

        output.set_in_registry(source.registry);
        output.refresh_derived();
        output
    }

    /// Mark the record as reported by a registry.
    pub fn set_in_registry(&mut self, registry: Registry) {
        let flag = match registry {
            Registry::DataCite => &mut self.in_datacite,
            Registry::OpenAire => &mut self.in_openaire,
            Registry::OpenAlex => &mut self.in_openalex,
        };
        *flag = Some(true);
    }

    /// Whether a registry reported this record.
    #[must_use]
    pub fn in_registry(&self, registry: Registry) -> bool {
        let flag = match registry {
            Registry::DataCite => self.in_datacite,
            Registry::OpenAire => self.in_openaire,
            Registry::OpenAlex => self.in_openalex,
        };
        flag == Some(true)
    }

    /// Merge key, when the DOI is known.
    #[must_use]
    pub fn key(&self) -> Option<DoiKey> {
        self.doi.as_deref().map(DoiKey::new)
    }

    /// Recompute fields derived from other fields.
    pub fn refresh_derived(&mut self) {
        self.title_word_count = self.title.as_deref().map(word_count);
    }
}

/// Whitespace-separated words in a string.
#[must_use]
pub fn word_count(text: &str) -> u32 {
    u32::try_from(text.split_whitespace().count()).unwrap_or(u32::MAX)
}

/// Enrichment one non-primary registry contributes for one output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delta {
    /// Candidate DOIs for the output, never empty.
    pub dois: Vec<String>,
    /// Attributes to union into the canonical record.
    pub patch: ResearchOutput,
}

impl Delta {
    /// Build a delta from a classified registry record.
    ///
    /// Returns `None` if the record has no DOI, since it cannot be matched.
    #[must_use]
    pub fn from_source(source: &SourceRecord, evidence: &MatchEvidence) -> Option<Self> {
        if source.dois.is_empty() {
            return None;
        }
        Some(Self { dois: source.dois.clone(), patch: ResearchOutput::from_source(source, evidence) })
    }

    /// Delta for a single DOI with the given patch; the patch DOI is set.
    #[must_use]
    pub fn new(doi: impl Into<String>, mut patch: ResearchOutput) -> Self {
        let doi = doi.into();
        patch.doi = Some(doi.clone());
        Self { dois: vec![doi], patch }
    }

    /// Merge keys of all candidate DOIs.
    #[must_use]
    pub fn keys(&self) -> Vec<DoiKey> {
        self.dois.iter().map(|d| DoiKey::new(d)).collect()
    }
}
