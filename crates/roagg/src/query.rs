//! Registry search expressions for an organization.
//!
//! The query is a recall filter: every clause is OR-ed, so anything that
//! mentions one of the names or the identifier in an affiliation-bearing field
//! is fetched. Precision comes later from [`crate::matching::classify`].

use crate::models::OrganizationIdentity;

/// Affiliation-bearing fields of one registry's search index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSchema {
    /// Fields searched with the name variants.
    pub name_fields: &'static [&'static str],
    /// Fields searched with the persistent identifier.
    pub identifier_fields: &'static [&'static str],
}

/// DataCite's Elasticsearch field paths.
pub const DATACITE_FIELDS: FieldSchema = FieldSchema {
    name_fields: &[
        "creators.affiliation.name",
        "contributors.affiliation.name",
        "publisher.name",
    ],
    identifier_fields: &[
        "publisher.publisherIdentifier",
        "creators.affiliation.affiliationIdentifier",
        "contributors.affiliation.affiliationIdentifier",
        "creators.nameIdentifiers.nameIdentifier",
        "contributors.nameIdentifiers.nameIdentifier",
    ],
};

/// Build the OR-union query for a set of names and an optional identifier.
///
/// Returns an empty string when there is nothing to search for; callers skip
/// the registry in that case. When the identifier carries the canonical ROR
/// prefix, clauses for the bare form are emitted too.
#[must_use]
pub fn build(names: &[String], identifier: Option<&str>, schema: &FieldSchema) -> String {
    let names: Vec<&str> =
        names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()).collect();
    let identifier = identifier.map(str::trim).filter(|i| !i.is_empty());

    if names.is_empty() && identifier.is_none() {
        return String::new();
    }

    let mut clauses = Vec::new();

    if !names.is_empty() {
        let name_conditions =
            names.iter().map(|n| quote(n)).collect::<Vec<_>>().join(" OR ");

        for field in schema.name_fields {
            clauses.push(format!("{field}:({name_conditions})"));
        }
    }

    if let Some(identifier) = identifier {
        let mut forms = vec![identifier.to_string()];
        if let Some(bare) = crate::models::strip_identifier_prefix(identifier) {
            if bare != identifier {
                forms.push(bare.to_string());
            }
        }

        for field in schema.identifier_fields {
            for form in &forms {
                clauses.push(format!("{field}:{}", quote(form)));
            }
        }
    }

    clauses.join(" OR ")
}

/// Build the query for an organization identity.
#[must_use]
pub fn for_identity(identity: &OrganizationIdentity, schema: &FieldSchema) -> String {
    build(identity.names(), identity.identifier().map(|id| id.full()), schema)
}

/// Double-quote a term, escaping embedded quotes and backslashes.
fn quote(term: &str) -> String {
    format!("\"{}\"", term.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES_ONLY: FieldSchema =
        FieldSchema { name_fields: &["publisher.name"], identifier_fields: &["publisher.id"] };

    #[test]
    fn test_empty_inputs_give_empty_query() {
        assert_eq!(build(&[], None, &DATACITE_FIELDS), "");
        assert_eq!(build(&["  ".to_string()], Some(""), &DATACITE_FIELDS), "");
    }

    #[test]
    fn test_names_only() {
        let names = vec!["Lund University".to_string(), "Lunds universitet".to_string()];
        assert_eq!(
            build(&names, None, &NAMES_ONLY),
            r#"publisher.name:("Lund University" OR "Lunds universitet")"#
        );
    }

    #[test]
    fn test_identifier_emits_prefixed_and_bare_forms() {
        let query = build(&[], Some("https://ror.org/012a77v79"), &NAMES_ONLY);
        assert_eq!(
            query,
            r#"publisher.id:"https://ror.org/012a77v79" OR publisher.id:"012a77v79""#
        );
    }

    #[test]
    fn test_unprefixed_identifier_emitted_once() {
        let query = build(&[], Some("012a77v79"), &NAMES_ONLY);
        assert_eq!(query, r#"publisher.id:"012a77v79""#);
    }

    #[test]
    fn test_quotes_are_escaped() {
        let names = vec![r#"The "Best" Institute"#.to_string()];
        assert_eq!(
            build(&names, None, &NAMES_ONLY),
            r#"publisher.name:("The \"Best\" Institute")"#
        );
    }

    #[test]
    fn test_datacite_union_covers_every_field() {
        let names = vec!["KTH".to_string()];
        let query = build(&names, Some("https://ror.org/026vcq606"), &DATACITE_FIELDS);

        for field in DATACITE_FIELDS.name_fields.iter().chain(DATACITE_FIELDS.identifier_fields) {
            assert!(query.contains(&format!("{field}:")), "missing {field}");
        }
        let clause_count = query.split(" OR ").filter(|c| c.contains(':')).count();
        assert_eq!(clause_count, 3 + 5 * 2);
    }
}
