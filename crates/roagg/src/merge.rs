//! Canonical record merger.
//!
//! Records from the primary registry populate a DOI-keyed working set; every
//! later registry contributes [`Delta`]s that are unioned into it field by
//! field. The reducers are pure so the rules can be tested in isolation:
//!
//! - match and provenance flags only ever move towards `true`
//! - `isLatestVersion` only ever moves towards `false`
//! - every other attribute keeps the first known value
//!
//! Output order is first-insertion order.

use std::collections::HashMap;

use crate::doi::DoiKey;
use crate::models::{Delta, ResearchOutput};

/// Where a [`CanonicalSet`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStage {
    /// Nothing loaded yet.
    Empty,
    /// Primary registry records loaded.
    PrimaryPopulated,
    /// `n` delta batches merged.
    Merged(usize),
}

/// Outcome of merging one delta batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Deltas applied to at least one existing record.
    pub merged: usize,
    /// Deltas that created a new standalone record.
    pub appended: usize,
    /// Existing records touched (a multi-DOI delta may touch several).
    pub records_updated: usize,
}

/// Monotonic OR: `true` wins, otherwise the first known value.
#[must_use]
pub fn union_flag(dest: Option<bool>, incoming: Option<bool>) -> Option<bool> {
    if dest == Some(true) || incoming == Some(true) {
        Some(true)
    } else {
        dest.or(incoming)
    }
}

/// `isLatestVersion` rule: once any evidence says `false` it stays `false`.
#[must_use]
pub fn union_latest(dest: Option<bool>, incoming: Option<bool>) -> Option<bool> {
    if dest == Some(false) || incoming == Some(false) {
        Some(false)
    } else {
        dest.or(incoming)
    }
}

fn first_known<T: Clone>(dest: Option<T>, incoming: Option<&T>) -> Option<T> {
    dest.or_else(|| incoming.cloned())
}

/// Union a patch into a record, returning the new record state.
///
/// Absent patch attributes never overwrite anything; the stored DOI keeps the
/// spelling it was first seen with.
#[must_use]
pub fn apply_delta(record: ResearchOutput, patch: &ResearchOutput) -> ResearchOutput {
    let mut next = ResearchOutput {
        doi: first_known(record.doi, patch.doi.as_ref()),
        client_id: first_known(record.client_id, patch.client_id.as_ref()),
        publication_year: record.publication_year.or(patch.publication_year),
        resource_type: first_known(record.resource_type, patch.resource_type.as_ref()),
        title: first_known(record.title, patch.title.as_ref()),
        publisher: first_known(record.publisher, patch.publisher.as_ref()),
        created_at: first_known(record.created_at, patch.created_at.as_ref()),
        updated_at: first_known(record.updated_at, patch.updated_at.as_ref()),

        is_publisher: union_flag(record.is_publisher, patch.is_publisher),
        is_funder: union_flag(record.is_funder, patch.is_funder),
        have_creator_affiliation: union_flag(
            record.have_creator_affiliation,
            patch.have_creator_affiliation,
        ),
        have_contributor_affiliation: union_flag(
            record.have_contributor_affiliation,
            patch.have_contributor_affiliation,
        ),
        is_latest_version: union_latest(record.is_latest_version, patch.is_latest_version),
        is_concept_doi: record.is_concept_doi.or(patch.is_concept_doi),

        match_publisher_ror: union_flag(record.match_publisher_ror, patch.match_publisher_ror),
        match_creator_affiliation_ror: union_flag(
            record.match_creator_affiliation_ror,
            patch.match_creator_affiliation_ror,
        ),
        match_contributor_affiliation_ror: union_flag(
            record.match_contributor_affiliation_ror,
            patch.match_contributor_affiliation_ror,
        ),
        match_funder_ror: union_flag(record.match_funder_ror, patch.match_funder_ror),
        match_publisher_name: union_flag(record.match_publisher_name, patch.match_publisher_name),
        match_creator_name: union_flag(record.match_creator_name, patch.match_creator_name),
        match_contributor_name: union_flag(
            record.match_contributor_name,
            patch.match_contributor_name,
        ),
        match_funder_name: union_flag(record.match_funder_name, patch.match_funder_name),

        in_datacite: union_flag(record.in_datacite, patch.in_datacite),
        in_openaire: union_flag(record.in_openaire, patch.in_openaire),
        in_openalex: union_flag(record.in_openalex, patch.in_openalex),

        openaire_best_access_right: first_known(
            record.openaire_best_access_right,
            patch.openaire_best_access_right.as_ref(),
        ),
        openaire_downloads: record.openaire_downloads.or(patch.openaire_downloads),
        openaire_views: record.openaire_views.or(patch.openaire_views),
        openaire_id: first_known(record.openaire_id, patch.openaire_id.as_ref()),
        openalex_id: first_known(record.openalex_id, patch.openalex_id.as_ref()),
        openalex_cited_by_count: record.openalex_cited_by_count.or(patch.openalex_cited_by_count),
        openalex_referenced_works_count: record
            .openalex_referenced_works_count
            .or(patch.openalex_referenced_works_count),

        title_word_count: None,
    };
    next.refresh_derived();
    next
}

/// The DOI-keyed working set of canonical records.
#[derive(Debug, Clone)]
pub struct CanonicalSet {
    records: Vec<ResearchOutput>,
    index: HashMap<DoiKey, usize>,
    stage: MergeStage,
}

impl Default for CanonicalSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CanonicalSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self { records: Vec::new(), index: HashMap::new(), stage: MergeStage::Empty }
    }

    /// Populate from the primary registry's classified records.
    ///
    /// A repeated DOI overwrites the earlier record in place, keeping the DOI
    /// spelling seen first. Records without a DOI are kept but cannot be
    /// merged into.
    #[must_use]
    pub fn from_primary(records: impl IntoIterator<Item = ResearchOutput>) -> Self {
        let mut set = Self::new();
        for mut record in records {
            record.refresh_derived();
            match record.key() {
                Some(key) => {
                    if let Some(&position) = set.index.get(&key) {
                        tracing::debug!(doi = %key, "Duplicate DOI in primary registry, keeping the later record");
                        let stored = &mut set.records[position];
                        record.doi = stored.doi.take();
                        *stored = record;
                    } else {
                        set.index.insert(key, set.records.len());
                        set.records.push(record);
                    }
                }
                None => {
                    tracing::warn!(title = ?record.title, "Primary record has no DOI, kept standalone");
                    set.records.push(record);
                }
            }
        }
        set.stage = MergeStage::PrimaryPopulated;
        set
    }

    /// Merge one registry's deltas.
    ///
    /// A delta is unioned into every record one of its DOIs already indexes.
    /// If none is indexed it becomes a new standalone record keyed by all of
    /// its DOIs.
    pub fn merge(&mut self, deltas: impl IntoIterator<Item = Delta>) -> MergeReport {
        let mut report = MergeReport::default();

        for delta in deltas {
            let keys = delta.keys();
            let mut positions: Vec<usize> =
                keys.iter().filter_map(|key| self.index.get(key).copied()).collect();
            positions.sort_unstable();
            positions.dedup();

            if positions.is_empty() {
                self.append(delta, keys);
                report.appended += 1;
                continue;
            }

            for &position in &positions {
                let current = std::mem::take(&mut self.records[position]);
                self.records[position] = apply_delta(current, &delta.patch);
            }
            report.merged += 1;
            report.records_updated += positions.len();
        }

        self.stage = match self.stage {
            MergeStage::Merged(n) => MergeStage::Merged(n + 1),
            MergeStage::Empty | MergeStage::PrimaryPopulated => MergeStage::Merged(1),
        };
        report
    }

    fn append(&mut self, delta: Delta, keys: Vec<DoiKey>) {
        let Delta { dois, patch } = delta;
        let mut record = patch;
        record.doi = dois.into_iter().next();
        record.refresh_derived();

        let position = self.records.len();
        for key in keys {
            self.index.entry(key).or_insert(position);
        }
        self.records.push(record);
    }

    /// Current lifecycle stage.
    #[must_use]
    pub const fn stage(&self) -> MergeStage {
        self.stage
    }

    /// Look up a record by DOI, case-insensitively.
    #[must_use]
    pub fn get(&self, doi: &str) -> Option<&ResearchOutput> {
        self.index.get(&DoiKey::new(doi)).map(|&i| &self.records[i])
    }

    /// Records in first-insertion order.
    #[must_use]
    pub fn records(&self) -> &[ResearchOutput] {
        &self.records
    }

    /// Number of canonical records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finish the run and take the merged records.
    #[must_use]
    pub fn into_records(self) -> Vec<ResearchOutput> {
        self.records
    }
}
