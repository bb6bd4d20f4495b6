//! Core resolution: raw registry records in, canonical outputs out.
//!
//! Everything here is synchronous and in-memory. Retrieval happens before,
//! serialization after.

use serde_json::Value;

use crate::matching::classify;
use crate::merge::{CanonicalSet, MergeReport};
use crate::models::{Delta, OrganizationIdentity, Registry, ResearchOutput, SourceRecord};

/// Fully retrieved raw records of one registry.
#[derive(Debug, Clone)]
pub struct RegistryBatch {
    /// Registry the records came from.
    pub registry: Registry,
    /// Raw registry-native JSON records, in retrieval order.
    pub records: Vec<Value>,
}

impl RegistryBatch {
    /// Create a batch.
    #[must_use]
    pub const fn new(registry: Registry, records: Vec<Value>) -> Self {
        Self { registry, records }
    }
}

/// Per-registry counts from one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    /// Registry.
    pub registry: Registry,
    /// Raw records received.
    pub received: usize,
    /// Records that failed typed parsing.
    pub unparsed: usize,
    /// Records without a usable DOI.
    pub without_doi: usize,
    /// Merge outcome; `None` for the primary batch.
    pub merge: Option<MergeReport>,
}

/// Result of [`resolve_with_summary`].
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Canonical records in first-insertion order.
    pub records: Vec<ResearchOutput>,
    /// One summary per input batch, in input order.
    pub batches: Vec<BatchSummary>,
}

/// Resolve raw records into canonical outputs.
///
/// The first batch is the primary registry; every later batch is merged into
/// it as deltas.
#[must_use]
pub fn resolve(identity: &OrganizationIdentity, batches: &[RegistryBatch]) -> Vec<ResearchOutput> {
    resolve_with_summary(identity, batches).records
}

/// [`resolve`], also reporting per-registry counts.
#[must_use]
pub fn resolve_with_summary(identity: &OrganizationIdentity, batches: &[RegistryBatch]) -> Resolution {
    let Some((first, rest)) = batches.split_first() else {
        return Resolution { records: Vec::new(), batches: Vec::new() };
    };

    let mut summaries = Vec::with_capacity(batches.len());

    let (parsed, mut summary) = parse_batch(first);
    let primary = parsed.iter().map(|record| {
        let evidence = classify(record, identity);
        tracing::debug!(
            registry = %first.registry,
            doi = ?record.doi(),
            ?evidence,
            "Classified primary record"
        );
        ResearchOutput::from_source(record, &evidence)
    });
    let mut set = CanonicalSet::from_primary(primary.collect::<Vec<_>>());
    summary.without_doi = parsed.iter().filter(|r| r.dois.is_empty()).count();
    tracing::info!(registry = %first.registry, records = set.len(), "Primary registry loaded");
    summaries.push(summary);

    for batch in rest {
        let (parsed, mut summary) = parse_batch(batch);
        let deltas: Vec<Delta> = parsed
            .iter()
            .filter_map(|record| {
                let evidence = classify(record, identity);
                let delta = Delta::from_source(record, &evidence);
                if delta.is_none() {
                    summary.without_doi += 1;
                    tracing::warn!(
                        registry = %batch.registry,
                        title = ?record.title,
                        "Record has no DOI, dropped from merge"
                    );
                }
                delta
            })
            .collect();

        let report = set.merge(deltas);
        tracing::info!(
            registry = %batch.registry,
            merged = report.merged,
            appended = report.appended,
            "Registry merged"
        );
        summary.merge = Some(report);
        summaries.push(summary);
    }

    Resolution { records: set.into_records(), batches: summaries }
}

fn parse_batch(batch: &RegistryBatch) -> (Vec<SourceRecord>, BatchSummary) {
    let mut summary = BatchSummary {
        registry: batch.registry,
        received: batch.records.len(),
        unparsed: 0,
        without_doi: 0,
        merge: None,
    };

    let parsed = batch
        .records
        .iter()
        .filter_map(|raw| match batch.registry.parse(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                summary.unparsed += 1;
                tracing::warn!(registry = %batch.registry, error = %e, "Skipping unparseable record");
                None
            }
        })
        .collect();

    (parsed, summary)
}
