//! The organization being resolved.

use std::collections::HashSet;

use crate::config::identifiers::{ROR_PREFIX, ROR_PREFIX_VARIANTS};
use crate::matching::PatternSet;

/// Strip a known identifier prefix (`https://ror.org/` and spellings of it).
///
/// Returns `None` when the value has no known prefix.
#[must_use]
pub fn strip_identifier_prefix(value: &str) -> Option<&str> {
    let lowered = value.to_ascii_lowercase();
    ROR_PREFIX_VARIANTS
        .iter()
        .find(|prefix| lowered.starts_with(*prefix))
        .map(|prefix| &value[prefix.len()..])
        .filter(|bare| !bare.is_empty())
}

/// A persistent organization identifier in both its prefixed and bare forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgIdentifier {
    full: String,
    bare: String,
}

impl OrgIdentifier {
    /// Parse an identifier. A bare ROR id gets the canonical prefix added.
    #[must_use]
    pub fn new(value: &str) -> Self {
        let value = value.trim();
        match strip_identifier_prefix(value) {
            Some(bare) => Self { full: format!("{ROR_PREFIX}{bare}"), bare: bare.to_string() },
            None => Self { full: format!("{ROR_PREFIX}{value}"), bare: value.to_string() },
        }
    }

    /// Canonical, prefixed form (`https://ror.org/0abc`).
    #[must_use]
    pub fn full(&self) -> &str {
        &self.full
    }

    /// Unprefixed form (`0abc`).
    #[must_use]
    pub fn bare(&self) -> &str {
        &self.bare
    }

    /// Equality against an identifier as some registry stored it.
    ///
    /// Accepts the prefixed form, any known prefix spelling, or the bare id.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return false;
        }
        let bare = strip_identifier_prefix(candidate).unwrap_or(candidate);
        bare.eq_ignore_ascii_case(&self.bare)
    }
}

/// Matching ground truth for one run: name variants plus an optional identifier.
///
/// Names are trimmed, empty ones dropped, and deduplicated case-insensitively
/// keeping the first spelling. The identity is immutable once built.
#[derive(Debug, Clone)]
pub struct OrganizationIdentity {
    names: Vec<String>,
    identifier: Option<OrgIdentifier>,
    patterns: PatternSet,
}

impl OrganizationIdentity {
    /// Build an identity.
    ///
    /// # Errors
    ///
    /// Returns error if a name pattern cannot be compiled.
    pub fn new<I, S>(names: I, identifier: Option<&str>) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.as_ref().trim().to_string())
            .filter(|n| !n.is_empty())
            .filter(|n| seen.insert(n.to_lowercase()))
            .collect();

        let identifier = identifier.map(str::trim).filter(|i| !i.is_empty()).map(OrgIdentifier::new);
        let patterns = PatternSet::new(&names)?;

        Ok(Self { names, identifier, patterns })
    }

    /// Return a copy of this identity with extra name variants appended.
    ///
    /// # Errors
    ///
    /// Returns error if a name pattern cannot be compiled.
    pub fn with_names<I, S>(&self, extra: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = self
            .names
            .iter()
            .cloned()
            .chain(extra.into_iter().map(|n| n.as_ref().to_string()))
            .collect::<Vec<_>>();
        Self::new(names, self.identifier.as_ref().map(OrgIdentifier::full))
    }

    /// Name variants in first-seen order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Persistent identifier, if any.
    #[must_use]
    pub fn identifier(&self) -> Option<&OrgIdentifier> {
        self.identifier.as_ref()
    }

    /// Compiled name patterns.
    #[must_use]
    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// True if neither names nor identifier are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.identifier.is_none()
    }

    /// True if the candidate equals the organization identifier.
    #[must_use]
    pub fn identifier_matches(&self, candidate: Option<&str>) -> bool {
        match (&self.identifier, candidate) {
            (Some(id), Some(candidate)) => id.matches(candidate),
            _ => false,
        }
    }

    /// True if the candidate satisfies any name pattern.
    #[must_use]
    pub fn name_matches(&self, candidate: Option<&str>) -> bool {
        self.patterns.matches(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_deduplicated_case_insensitively() {
        let identity =
            OrganizationIdentity::new(["Lund University", " lund university ", "", "LU"], None)
                .unwrap();
        assert_eq!(identity.names(), ["Lund University", "LU"]);
    }

    #[test]
    fn test_identifier_forms() {
        let id = OrgIdentifier::new("https://ror.org/012a77v79");
        assert_eq!(id.full(), "https://ror.org/012a77v79");
        assert_eq!(id.bare(), "012a77v79");

        let bare = OrgIdentifier::new("012a77v79");
        assert_eq!(bare, id);
    }

    #[test]
    fn test_identifier_matches_any_spelling() {
        let id = OrgIdentifier::new("https://ror.org/012a77v79");
        assert!(id.matches("https://ror.org/012a77v79"));
        assert!(id.matches("http://ror.org/012A77V79"));
        assert!(id.matches("ror.org/012a77v79"));
        assert!(id.matches("012a77v79"));
        assert!(!id.matches("https://ror.org/00000000"));
        assert!(!id.matches(""));
    }

    #[test]
    fn test_empty_identity() {
        let identity = OrganizationIdentity::new(Vec::<String>::new(), Some("  ")).unwrap();
        assert!(identity.is_empty());
        assert!(!identity.identifier_matches(Some("anything")));
    }

    #[test]
    fn test_with_names_keeps_identifier() {
        let identity = OrganizationIdentity::new(["KTH"], Some("https://ror.org/026vcq606")).unwrap();
        let seeded = identity.with_names(["KTH Royal Institute of Technology", "kth"]).unwrap();
        assert_eq!(seeded.names(), ["KTH", "KTH Royal Institute of Technology"]);
        assert_eq!(seeded.identifier(), identity.identifier());
    }
}
