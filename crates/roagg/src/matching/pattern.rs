//! Wildcard name patterns.
//!
//! A pattern without `*` or `?` matches by case-insensitive substring
//! containment. A pattern with either is a glob anchored at both ends:
//! `*` is zero or more characters, `?` exactly one, everything else literal.

use regex::{Regex, RegexBuilder};

/// A single compiled name pattern.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Lower-cased needle for substring containment.
    Substring(String),
    /// Anchored, case-insensitive glob.
    Glob(Regex),
}

impl Pattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns error if the translated glob exceeds the regex size limit.
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        if !has_wildcard(pattern) {
            return Ok(Self::Substring(pattern.to_lowercase()));
        }

        let regex = RegexBuilder::new(&glob_to_regex(pattern))
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()?;

        Ok(Self::Glob(regex))
    }

    /// Check a candidate against this pattern.
    #[must_use]
    pub fn is_match(&self, candidate: &str) -> bool {
        match self {
            Self::Substring(needle) => candidate.to_lowercase().contains(needle.as_str()),
            Self::Glob(regex) => regex.is_match(candidate),
        }
    }
}

/// An ordered set of compiled patterns, evaluated with short-circuit OR.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile every pattern.
    ///
    /// # Errors
    ///
    /// Returns the first compilation error.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Pattern::compile(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// True if the candidate is present and any pattern matches it.
    #[must_use]
    pub fn matches(&self, candidate: Option<&str>) -> bool {
        candidate.is_some_and(|c| self.patterns.iter().any(|p| p.is_match(c)))
    }

    /// Number of patterns in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if the set has no patterns (and therefore never matches).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// One-shot form of [`PatternSet::matches`].
///
/// Patterns that fail to compile are treated as non-matching.
#[must_use]
pub fn matches<S: AsRef<str>>(candidate: Option<&str>, patterns: &[S]) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };

    patterns.iter().any(|p| {
        Pattern::compile(p.as_ref()).is_ok_and(|compiled| compiled.is_match(candidate))
    })
}

/// True if the pattern uses glob metacharacters.
#[must_use]
pub fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(['*', '?'])
}

/// Translate a glob into an anchored regex source string.
#[must_use]
pub fn glob_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 2);
    regex.push('^');

    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            other => regex.push_str(&regex::escape(other.encode_utf8(&mut buf))),
        }
    }

    regex.push('$');
    regex
}
