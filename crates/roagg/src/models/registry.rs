//! Bibliographic registries the aggregator knows how to read.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{SourceRecord, datacite, openaire, openalex};

/// A registry that reports research outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Registry {
    /// DataCite DOI registry (primary by default).
    #[default]
    DataCite,
    /// OpenAIRE Graph.
    OpenAire,
    /// OpenAlex.
    OpenAlex,
}

impl Registry {
    /// Default registry order; the first is the primary.
    pub const ALL: [Self; 3] = [Self::DataCite, Self::OpenAire, Self::OpenAlex];

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DataCite => "DataCite",
            Self::OpenAire => "OpenAIRE",
            Self::OpenAlex => "OpenAlex",
        }
    }

    /// Parse one raw registry record into the registry-neutral form.
    ///
    /// # Errors
    ///
    /// Returns error if the record does not have the registry's shape at all
    /// (for example a string where an object is expected). Missing fields are
    /// not errors.
    pub fn parse(self, raw: &serde_json::Value) -> Result<SourceRecord, serde_json::Error> {
        match self {
            Self::DataCite => datacite::parse(raw),
            Self::OpenAire => openaire::parse(raw),
            Self::OpenAlex => openalex::parse(raw),
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Registry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "datacite" => Ok(Self::DataCite),
            "openaire" => Ok(Self::OpenAire),
            "openalex" => Ok(Self::OpenAlex),
            other => Err(format!("unknown registry '{other}' (expected datacite, openaire or openalex)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_roundtrip() {
        for registry in Registry::ALL {
            assert_eq!(registry.name().parse::<Registry>(), Ok(registry));
        }
        assert!("crossref".parse::<Registry>().is_err());
    }

    #[test]
    fn test_datacite_is_default_primary() {
        assert_eq!(Registry::default(), Registry::ALL[0]);
    }
}
