//! DOI validation, extraction and normalization.
//!
//! Registries spell the same DOI differently: bare (`10.1234/abc`), behind a
//! resolver (`https://doi.org/10.1234/abc`), or only as a landing-page URL of a
//! repository that mints DOIs from its record ids. Everything here reduces
//! those spellings to the bare `10.PREFIX/SUFFIX` form.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Anchored DOI syntax.
static VALID_DOI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^10\.[0-9]{4,9}/[-._;()/:A-Z0-9]+$").expect("valid DOI regex pattern")
});

/// Unanchored DOI syntax for scanning free text.
static DOI_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b10\.[0-9]{4,9}/[-._;()/:A-Za-z0-9]+").expect("valid DOI scan pattern")
});

/// Zenodo landing pages; the record id is the suffix of the Zenodo DOI.
static ZENODO_RECORD_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://zenodo\.org/records?/([0-9]+)[^\s]*")
        .expect("valid zenodo record pattern")
});

/// Vendor URL prefixes that wrap a DOI verbatim.
const DOI_URL_ALIASES: &[(&str, &str)] = &[
    ("https://doi.pangaea.de/", "https://doi.org/"),
    ("http://doi.pangaea.de/", "https://doi.org/"),
    ("https://zenodo.org/doi/", "https://doi.org/"),
    ("http://zenodo.org/doi/", "https://doi.org/"),
];

/// Resolver prefixes stripped from DOIs stored as URLs.
const RESOLVER_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi.org/",
    "doi:",
];

/// Zenodo's DOI prefix.
pub const ZENODO_DOI_PREFIX: &str = "10.5281/zenodo.";

/// Check that a string is exactly one DOI, with nothing around it.
#[must_use]
pub fn is_valid(doi: &str) -> bool {
    VALID_DOI.is_match(doi)
}

/// Find every DOI in free text, in order of appearance.
#[must_use]
pub fn extract_all(text: &str) -> Vec<String> {
    DOI_IN_TEXT
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|doi| is_valid(doi))
        .map(str::to_string)
        .collect()
}

/// Rewrite known vendor landing-page URLs into resolver URLs.
///
/// Zenodo record pages become the Zenodo DOI (`10.5281/zenodo.<id>`); PANGAEA
/// and Zenodo DOI-path URLs are moved onto the doi.org resolver.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let mut normalized = ZENODO_RECORD_URL
        .replace_all(url, format!("https://doi.org/{ZENODO_DOI_PREFIX}${{1}}").as_str())
        .into_owned();

    for (alias, resolver) in DOI_URL_ALIASES {
        normalized = normalized.replace(alias, resolver);
    }

    normalized
}

/// Extract DOIs from a URL after vendor normalization.
#[must_use]
pub fn extract_from_url(url: &str) -> Vec<String> {
    extract_all(&normalize_url(url))
}

/// Strip a resolver prefix (`https://doi.org/`, `doi:` ...) from a stored DOI.
///
/// Returns `None` when what remains is not a valid DOI.
#[must_use]
pub fn strip_resolver_prefix(value: &str) -> Option<String> {
    let trimmed = value.trim();
    let lowered = trimmed.to_ascii_lowercase();

    let bare = RESOLVER_PREFIXES
        .iter()
        .find(|prefix| lowered.starts_with(*prefix))
        .map_or(trimmed, |prefix| &trimmed[prefix.len()..]);

    is_valid(bare).then(|| bare.to_string())
}

/// Case-insensitive identity of a DOI, used as the merge key.
///
/// Two records are the same output iff their keys are equal. The original
/// spelling is kept on the record itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoiKey(String);

impl DoiKey {
    /// Build the key for a DOI.
    #[must_use]
    pub fn new(doi: &str) -> Self {
        Self(doi.trim().to_lowercase())
    }

    /// The lower-cased DOI.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DoiKey {
    fn from(doi: &str) -> Self {
        Self::new(doi)
    }
}

impl fmt::Display for DoiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
