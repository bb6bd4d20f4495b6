//! OpenAIRE Graph `researchProducts` records.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use super::lenient;
use super::{Agent, Enrichment, Registry, SourceRecord};
use crate::doi;

/// A research product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchProduct {
    /// OpenAIRE id.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,

    /// Main title.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub main_title: Option<String>,

    /// Product type ("dataset", "publication" ...).
    #[serde(default, rename = "type", deserialize_with = "lenient::opt_string")]
    pub product_type: Option<String>,

    /// Publication date (`YYYY-MM-DD`).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub publication_date: Option<String>,

    /// Publisher name.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub publisher: Option<String>,

    /// Best access right.
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    pub best_access_right: Option<AccessRight>,

    /// Usage indicators.
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    pub indicators: Option<Indicators>,

    /// Manifestations of the product.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub instances: Vec<Instance>,
}

/// Access right classification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessRight {
    /// Label ("OPEN", "RESTRICTED" ...).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub label: Option<String>,
}

/// Indicators block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    /// Usage counters.
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    pub usage_counts: Option<UsageCounts>,
}

/// Usage counters (numbers or numeric strings).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsageCounts {
    /// Downloads.
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub downloads: Option<u64>,

    /// Views.
    #[serde(default, deserialize_with = "lenient::opt_u64")]
    pub views: Option<u64>,
}

/// One instance (manifestation) of a product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Persistent identifiers.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub pids: Vec<Pid>,

    /// Alternate identifiers.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub alternate_identifiers: Vec<Pid>,

    /// Landing page URLs.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub urls: Vec<Option<String>>,
}

/// `{ "scheme": "doi", "value": "10..." }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pid {
    /// Scheme.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub scheme: Option<String>,

    /// Value.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,
}

impl Pid {
    fn doi(&self) -> Option<String> {
        let is_doi = self.scheme.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("doi"));
        if !is_doi {
            return None;
        }
        let value = self.value.as_deref()?;
        doi::strip_resolver_prefix(value).or_else(|| doi::extract_all(value).into_iter().next())
    }
}

impl ResearchProduct {
    /// DOIs of the product.
    ///
    /// Declared identifiers win; instance URLs are only scanned when no
    /// instance declares a DOI. Deduplicated case-insensitively, in order.
    #[must_use]
    pub fn dois(&self) -> Vec<String> {
        let mut found: Vec<String> = self
            .instances
            .iter()
            .flat_map(|i| i.pids.iter().chain(&i.alternate_identifiers))
            .filter_map(Pid::doi)
            .collect();

        if found.is_empty() {
            found = self
                .instances
                .iter()
                .flat_map(|i| i.urls.iter().flatten())
                .flat_map(|url| doi::extract_from_url(url))
                .collect();
        }

        let mut seen = HashSet::new();
        found.retain(|d| seen.insert(d.to_lowercase()));
        found
    }
}

/// Year from an ISO date, falling back to a leading four-digit year.
pub(crate) fn year_from_date(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|d| d.year())
        .ok()
        .or_else(|| date.trim().get(..4).and_then(|y| y.parse().ok()))
}

/// Parse one OpenAIRE research product.
pub fn parse(raw: &serde_json::Value) -> Result<SourceRecord, serde_json::Error> {
    let product = ResearchProduct::deserialize(raw)?;
    let dois = product.dois();

    let usage = product.indicators.and_then(|i| i.usage_counts).unwrap_or_default();

    Ok(SourceRecord {
        registry: Registry::OpenAire,
        dois,
        publication_year: product.publication_date.as_deref().and_then(year_from_date),
        resource_type: product.product_type,
        title: product.main_title,
        publisher: product.publisher.map(|name| Agent { name: Some(name), identifier: None }),
        enrichment: Enrichment {
            openaire_best_access_right: product.best_access_right.and_then(|a| a.label),
            openaire_downloads: usage.downloads,
            openaire_views: usage.views,
            openaire_id: product.id,
            ..Enrichment::default()
        },
        ..SourceRecord::new(Registry::OpenAire)
    })
}
