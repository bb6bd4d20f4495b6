//! Deciding whether strings and records belong to the organization.

mod affiliation;
mod pattern;

pub use affiliation::{
    EvidenceKind, FacetEvidence, MatchEvidence, classify, match_agent, match_contributor,
    match_contributors,
};
pub use pattern::{Pattern, PatternSet, glob_to_regex, has_wildcard, matches};
