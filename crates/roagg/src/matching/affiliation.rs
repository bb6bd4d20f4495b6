//! Per-record affiliation classification.
//!
//! The retrieval query over-fetches on purpose. This module decides, facet by
//! facet, whether a record actually evidences the organization and records
//! which kind of evidence fired.

use crate::models::{Agent, Contributor, OrganizationIdentity, SourceRecord};

/// What produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvidenceKind {
    /// Persistent identifier equality.
    Identifier,
    /// Name pattern.
    Name,
}

/// Evidence collected over one facet (a list of contributors, or one agent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FacetEvidence {
    /// Some entry matched by identifier.
    pub by_identifier: bool,
    /// Some entry matched by name.
    pub by_name: bool,
}

impl FacetEvidence {
    /// True if any entry in the facet matched.
    #[must_use]
    pub const fn matched(self) -> bool {
        self.by_identifier || self.by_name
    }

    fn record(&mut self, kind: Option<EvidenceKind>) {
        match kind {
            Some(EvidenceKind::Identifier) => self.by_identifier = true,
            Some(EvidenceKind::Name) => self.by_name = true,
            None => {}
        }
    }
}

/// Classification of one record. A facet the registry does not report is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchEvidence {
    /// Publisher facet.
    pub publisher: Option<FacetEvidence>,
    /// Creators facet.
    pub creators: Option<FacetEvidence>,
    /// Contributors facet.
    pub contributors: Option<FacetEvidence>,
    /// Funders facet.
    pub funders: Option<FacetEvidence>,
}

impl MatchEvidence {
    /// `isPublisher`.
    #[must_use]
    pub fn is_publisher(&self) -> Option<bool> {
        self.publisher.map(FacetEvidence::matched)
    }

    /// `haveCreatorAffiliation`.
    #[must_use]
    pub fn have_creator_affiliation(&self) -> Option<bool> {
        self.creators.map(FacetEvidence::matched)
    }

    /// `haveContributorAffiliation`.
    #[must_use]
    pub fn have_contributor_affiliation(&self) -> Option<bool> {
        self.contributors.map(FacetEvidence::matched)
    }

    /// `isFunder`.
    #[must_use]
    pub fn is_funder(&self) -> Option<bool> {
        self.funders.map(FacetEvidence::matched)
    }

    /// True if any facet matched.
    #[must_use]
    pub fn any(&self) -> bool {
        [self.publisher, self.creators, self.contributors, self.funders]
            .into_iter()
            .flatten()
            .any(FacetEvidence::matched)
    }
}

/// Match one contributor.
///
/// Checks, in order and stopping at the first hit: identifiers attached to the
/// contributor, the contributor's own name, then each affiliation (identifier
/// before name).
#[must_use]
pub fn match_contributor(
    contributor: &Contributor,
    identity: &OrganizationIdentity,
) -> Option<EvidenceKind> {
    if contributor.identifiers.iter().any(|id| identity.identifier_matches(Some(id.as_str()))) {
        return Some(EvidenceKind::Identifier);
    }

    if identity.name_matches(contributor.name.as_deref()) {
        return Some(EvidenceKind::Name);
    }

    contributor.affiliations.iter().find_map(|affiliation| {
        if identity.identifier_matches(affiliation.identifier.as_deref()) {
            Some(EvidenceKind::Identifier)
        } else if identity.name_matches(affiliation.name.as_deref()) {
            Some(EvidenceKind::Name)
        } else {
            None
        }
    })
}

/// Match a publisher or funder: identifier equality, then name pattern.
#[must_use]
pub fn match_agent(agent: &Agent, identity: &OrganizationIdentity) -> Option<EvidenceKind> {
    if identity.identifier_matches(agent.identifier.as_deref()) {
        Some(EvidenceKind::Identifier)
    } else if identity.name_matches(agent.name.as_deref()) {
        Some(EvidenceKind::Name)
    } else {
        None
    }
}

/// Evidence over a contributor list. Every entry is examined so both kinds
/// can be reported.
#[must_use]
pub fn match_contributors(
    contributors: &[Contributor],
    identity: &OrganizationIdentity,
) -> FacetEvidence {
    let mut evidence = FacetEvidence::default();
    for contributor in contributors {
        evidence.record(match_contributor(contributor, identity));
    }
    evidence
}

fn match_agents(agents: &[Agent], identity: &OrganizationIdentity) -> FacetEvidence {
    let mut evidence = FacetEvidence::default();
    for agent in agents {
        evidence.record(match_agent(agent, identity));
    }
    evidence
}

/// Classify a record against the organization.
#[must_use]
pub fn classify(record: &SourceRecord, identity: &OrganizationIdentity) -> MatchEvidence {
    MatchEvidence {
        publisher: record.publisher.as_ref().map(|p| match_agents(std::slice::from_ref(p), identity)),
        creators: record.creators.as_deref().map(|c| match_contributors(c, identity)),
        contributors: record.contributors.as_deref().map(|c| match_contributors(c, identity)),
        funders: record.funders.as_deref().map(|f| match_agents(f, identity)),
    }
}
