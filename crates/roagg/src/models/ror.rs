//! ROR v2 organization records, used to seed name variants.

use std::collections::HashSet;

use serde::Deserialize;

use super::lenient;

/// Name types worth matching on; acronyms are too ambiguous.
const NAME_TYPES: &[&str] = &["ror_display", "alias", "label"];

/// A ROR organization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RorOrganization {
    /// ROR id URL.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,

    /// All names.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub names: Vec<RorName>,
}

/// One ROR name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RorName {
    /// Name text.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub value: Option<String>,

    /// Name types.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub types: Vec<String>,

    /// ISO 639-1 language, if any.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub lang: Option<String>,
}

impl RorOrganization {
    /// English or language-less display names, aliases and labels.
    #[must_use]
    pub fn name_variants(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.names
            .iter()
            .filter(|n| n.lang.as_deref().is_none_or(|lang| lang.eq_ignore_ascii_case("en")))
            .filter(|n| n.types.iter().any(|t| NAME_TYPES.contains(&t.as_str())))
            .filter_map(|n| n.value.clone())
            .filter(|v| seen.insert(v.to_lowercase()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_name_variants() {
        let org: RorOrganization = serde_json::from_value(json!({
            "id": "https://ror.org/012a77v79",
            "names": [
                {"value": "Lund University", "types": ["ror_display", "label"], "lang": "en"},
                {"value": "Lunds universitet", "types": ["label"], "lang": "sv"},
                {"value": "LU", "types": ["acronym"], "lang": null},
                {"value": "Universitas Lundensis", "types": ["alias"], "lang": null},
                {"value": "lund university", "types": ["alias"], "lang": "en"}
            ]
        }))
        .unwrap();

        assert_eq!(org.name_variants(), vec!["Lund University", "Universitas Lundensis"]);
    }
}
