//! DataCite JSON:API `dois` records.
//!
//! Requested with `affiliation=true&publisher=true`, publisher and affiliations
//! are objects carrying identifiers; older clients and some responses still
//! send them as plain strings, so both shapes are accepted.

use serde::Deserialize;
use serde::de::IgnoredAny;

use super::lenient;
use super::{Affiliation, Agent, Contributor, Registry, SourceRecord};
use crate::doi;

/// Relation types meaning "a newer version of this record exists".
const SUPERSEDED_RELATIONS: &[&str] = &["ispreviousversionof", "hasnewerversion"];

/// One element of the `data` array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCiteRecord {
    /// DOI as record id.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,

    /// Metadata attributes.
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    pub attributes: Option<Attributes>,

    /// Relationships (client, provider ...).
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    pub relationships: Option<Relationships>,
}

/// Record attributes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    /// DOI.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub doi: Option<String>,

    /// Publication year (number or string).
    #[serde(default, deserialize_with = "lenient::opt_i32")]
    pub publication_year: Option<i32>,

    /// Resource types.
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    pub types: Option<Types>,

    /// Titles.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub titles: Vec<Title>,

    /// Publisher.
    #[serde(default)]
    pub publisher: Option<PublisherField>,

    /// Creators.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub creators: Vec<Creator>,

    /// Contributors.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub contributors: Vec<Creator>,

    /// Funding references.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub funding_references: Vec<FundingReference>,

    /// Related identifiers.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub related_identifiers: Vec<RelatedIdentifier>,

    /// Versions derived from this DOI.
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub version_count: Option<u32>,

    /// DOIs this one is a version of.
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub version_of_count: Option<u32>,

    /// Created timestamp.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub created: Option<String>,

    /// Updated timestamp.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub updated: Option<String>,
}

/// Resource types.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Types {
    /// Controlled general type ("Dataset", "Software" ...).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub resource_type_general: Option<String>,

    /// Free-text type.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub resource_type: Option<String>,
}

/// A title entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Title {
    /// Title text.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
}

/// Publisher as a bare name or an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PublisherField {
    /// Plain name.
    Name(String),
    /// Object with identifier.
    Object(PublisherObject),
    /// Anything else.
    Other(IgnoredAny),
}

/// Publisher object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherObject {
    /// Name.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,

    /// Identifier (ROR for organizations).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub publisher_identifier: Option<String>,
}

/// Creator or contributor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    /// Display name.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,

    /// Identifiers of the person or organization itself.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub name_identifiers: Vec<NameIdentifier>,

    /// Affiliations.
    #[serde(default, deserialize_with = "lenient::vec")]
    pub affiliation: Vec<AffiliationField>,
}

/// A name identifier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameIdentifier {
    /// Identifier value.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name_identifier: Option<String>,
}

/// Affiliation as a bare name or an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AffiliationField {
    /// Plain name.
    Name(String),
    /// Object with identifier.
    Object(AffiliationObject),
    /// Anything else.
    Other(IgnoredAny),
}

/// Affiliation object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliationObject {
    /// Name.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,

    /// Identifier.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub affiliation_identifier: Option<String>,
}

/// Funding reference.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingReference {
    /// Funder name.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub funder_name: Option<String>,

    /// Funder identifier.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub funder_identifier: Option<String>,
}

/// Related identifier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedIdentifier {
    /// Relation type ("IsPreviousVersionOf" ...).
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub relation_type: Option<String>,
}

/// Relationships block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relationships {
    /// Repository client.
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    pub client: Option<RelationshipLink>,
}

/// `{ "data": { "id": ... } }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationshipLink {
    /// Linked resource.
    #[serde(default, deserialize_with = "lenient::opt_struct")]
    pub data: Option<RelationshipData>,
}

/// Linked resource id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelationshipData {
    /// Resource id.
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
}

impl From<PublisherField> for Agent {
    fn from(field: PublisherField) -> Self {
        match field {
            PublisherField::Name(name) => Self { name: Some(name), identifier: None },
            PublisherField::Object(obj) => {
                Self { name: obj.name, identifier: obj.publisher_identifier }
            }
            PublisherField::Other(_) => Self::default(),
        }
    }
}

impl From<Creator> for Contributor {
    fn from(creator: Creator) -> Self {
        let affiliations = creator
            .affiliation
            .into_iter()
            .filter_map(|a| match a {
                AffiliationField::Name(name) => Some(Affiliation::named(name)),
                AffiliationField::Object(obj) => Some(Affiliation {
                    name: obj.name,
                    identifier: obj.affiliation_identifier,
                }),
                AffiliationField::Other(_) => None,
            })
            .collect();

        Self {
            name: creator.name,
            affiliations,
            identifiers: creator
                .name_identifiers
                .into_iter()
                .filter_map(|id| id.name_identifier)
                .collect(),
        }
    }
}

/// Parse one DataCite record.
pub fn parse(raw: &serde_json::Value) -> Result<SourceRecord, serde_json::Error> {
    let record = DataCiteRecord::deserialize(raw)?;
    let attributes = record.attributes.unwrap_or_default();

    let dois = attributes
        .doi
        .as_deref()
        .or(record.id.as_deref())
        .and_then(doi::strip_resolver_prefix)
        .into_iter()
        .collect();

    let resource_type = attributes
        .types
        .and_then(|t| t.resource_type_general.or(t.resource_type));

    let superseded = attributes.related_identifiers.iter().any(|rel| {
        rel.relation_type
            .as_deref()
            .is_some_and(|t| SUPERSEDED_RELATIONS.contains(&t.to_ascii_lowercase().as_str()))
    });

    let client_id = record
        .relationships
        .and_then(|r| r.client)
        .and_then(|c| c.data)
        .and_then(|d| d.id);

    Ok(SourceRecord {
        registry: Registry::DataCite,
        dois,
        client_id,
        publication_year: attributes.publication_year,
        resource_type,
        title: attributes.titles.into_iter().find_map(|t| t.title),
        publisher: Some(attributes.publisher.map(Agent::from).unwrap_or_default()),
        creators: Some(attributes.creators.into_iter().map(Contributor::from).collect()),
        contributors: Some(attributes.contributors.into_iter().map(Contributor::from).collect()),
        funders: Some(
            attributes
                .funding_references
                .into_iter()
                .map(|f| Agent { name: f.funder_name, identifier: f.funder_identifier })
                .collect(),
        ),
        version_count: attributes.version_count,
        version_of_count: attributes.version_of_count,
        superseded,
        reports_versions: true,
        created_at: attributes.created,
        updated_at: attributes.updated,
        enrichment: super::Enrichment::default(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_object_shapes() {
        let raw = json!({
            "id": "10.5878/abc",
            "type": "dois",
            "attributes": {
                "doi": "10.5878/ABC",
                "publicationYear": "2021",
                "types": {"resourceTypeGeneral": "Dataset", "resourceType": "Survey"},
                "titles": [{"title": "Household survey 2021"}],
                "publisher": {"name": "Lund University", "publisherIdentifier": "https://ror.org/012a77v79"},
                "creators": [{
                    "name": "Doe, Jane",
                    "nameIdentifiers": [{"nameIdentifier": "https://orcid.org/0000-0001-2345-6789"}],
                    "affiliation": [{"name": "Lund University", "affiliationIdentifier": "https://ror.org/012a77v79"}]
                }],
                "relatedIdentifiers": [{"relationType": "IsPreviousVersionOf", "relatedIdentifier": "10.5878/abd"}],
                "versionCount": 0,
                "versionOfCount": 1
            },
            "relationships": {"client": {"data": {"id": "snd.lu", "type": "clients"}}}
        });

        let record = parse(&raw).unwrap();
        assert_eq!(record.dois, vec!["10.5878/ABC"]);
        assert_eq!(record.publication_year, Some(2021));
        assert_eq!(record.resource_type.as_deref(), Some("Dataset"));
        assert_eq!(record.title.as_deref(), Some("Household survey 2021"));
        assert_eq!(record.client_id.as_deref(), Some("snd.lu"));
        assert_eq!(
            record.publisher.as_ref().and_then(|p| p.identifier.as_deref()),
            Some("https://ror.org/012a77v79")
        );
        let creators = record.creators.as_ref().unwrap();
        assert_eq!(creators[0].identifiers.len(), 1);
        assert_eq!(creators[0].affiliations[0].name.as_deref(), Some("Lund University"));
        assert_eq!(record.is_latest_version(), Some(false));
        assert_eq!(record.is_concept_doi(), Some(false));
    }

    #[test]
    fn test_parse_string_shapes() {
        let raw = json!({
            "id": "10.5878/xyz",
            "attributes": {
                "publisher": "Some Publisher",
                "creators": [{"name": "Doe, John", "affiliation": ["Lund University", 7]}],
                "contributors": null
            }
        });

        let record = parse(&raw).unwrap();
        assert_eq!(record.dois, vec!["10.5878/xyz"]);
        assert_eq!(record.is_latest_version(), Some(true));
        assert_eq!(
            record.publisher.as_ref().and_then(|p| p.name.as_deref()),
            Some("Some Publisher")
        );
        let creators = record.creators.as_ref().unwrap();
        assert_eq!(creators[0].affiliations, vec![Affiliation::named("Lund University")]);
        assert_eq!(record.contributors, Some(vec![]));
    }

    #[test]
    fn test_parse_without_doi() {
        let record = parse(&json!({"attributes": {"titles": []}})).unwrap();
        assert!(record.dois.is_empty());
        assert!(record.publisher.is_some());
    }

    #[test]
    fn test_parse_misshaped_nested_fields() {
        let raw = json!({
            "id": "10.5555/x",
            "attributes": {
                "doi": "10.5555/X",
                "types": "Dataset",
                "titles": ["Bare title", {"title": "Object title"}],
                "creators": [{"name": "Doe, Jane", "nameIdentifiers": "0000-0001"}, "Doe, John"],
                "publisher": {"name": "SND", "publisherIdentifier": "https://ror.org/012a77v79"}
            },
            "relationships": {"client": "snd.lu"}
        });

        let record = parse(&raw).unwrap();
        assert_eq!(record.dois, vec!["10.5555/X"]);
        assert_eq!(record.resource_type, None);
        assert_eq!(record.client_id, None);
        assert_eq!(record.title.as_deref(), Some("Object title"));
        let creators = record.creators.as_ref().unwrap();
        assert_eq!(creators.len(), 1);
        assert!(creators[0].identifiers.is_empty());
        assert_eq!(
            record.publisher.as_ref().and_then(|p| p.identifier.as_deref()),
            Some("https://ror.org/012a77v79")
        );
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(parse(&json!("not a record")).is_err());
    }
}
