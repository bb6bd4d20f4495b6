//! Name pattern and affiliation classification tests.
//!
//! Records are built from registry JSON so the parsers and the matcher are
//! exercised together.

use serde_json::json;

use roagg::matching::{EvidenceKind, PatternSet, classify, match_contributor, matches};
use roagg::models::{Contributor, OrganizationIdentity, Registry};

const LUND_ROR: &str = "https://ror.org/012a77v79";

fn lund() -> OrganizationIdentity {
    OrganizationIdentity::new(["Lund University", "Lunds universitet"], Some(LUND_ROR)).unwrap()
}

// =============================================================================
// Pattern Matcher
// =============================================================================

#[test]
fn test_substring_is_case_insensitive() {
    assert!(matches(Some("Department of Biology, LUND UNIVERSITY"), &["Lund University"]));
    assert!(!matches(Some("Lund Observatory"), &["Lund University"]));
}

#[test]
fn test_glob_is_anchored() {
    assert!(matches(Some("University of X"), &["Uni*"]));
    assert!(!matches(Some("The University"), &["Uni*"]));
    assert!(matches(Some("The University"), &["*Uni*"]));
}

#[test]
fn test_question_mark_is_one_character() {
    assert!(matches(Some("Lunds universitet"), &["Lund? universitet"]));
    assert!(!matches(Some("Lund universitet"), &["Lund? universitet"]));
}

#[test]
fn test_glob_metacharacters_are_literal() {
    assert!(matches(Some("Univ. (Lund)"), &["Univ. (Lund)*"]));
    assert!(!matches(Some("UnivX (Lund)"), &["Univ. (Lund)*"]));
}

#[test]
fn test_absent_candidate_and_empty_set() {
    assert!(!matches(None, &["Lund"]));
    assert!(!matches::<&str>(Some("Lund"), &[]));
    assert!(!PatternSet::default().matches(Some("anything")));
}

#[test]
fn test_first_matching_pattern_wins() {
    let set = PatternSet::new(["Uppsala*", "*Lund*"]).unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.matches(Some("Lund University Hospital")));
}

// =============================================================================
// Affiliation Matcher on DataCite records
// =============================================================================

fn datacite(attributes: serde_json::Value) -> serde_json::Value {
    json!({"id": "10.5878/abc", "type": "dois", "attributes": attributes})
}

#[test]
fn test_publisher_identifier_evidence() {
    let raw = datacite(json!({
        "doi": "10.5878/abc",
        "publisher": {"name": "Swedish National Data Service", "publisherIdentifier": LUND_ROR},
        "creators": [],
        "contributors": []
    }));
    let record = Registry::DataCite.parse(&raw).unwrap();
    let evidence = classify(&record, &lund());

    assert_eq!(evidence.is_publisher(), Some(true));
    assert!(evidence.publisher.unwrap().by_identifier);
    assert!(!evidence.publisher.unwrap().by_name);
    assert_eq!(evidence.have_creator_affiliation(), Some(false));
}

#[test]
fn test_bare_identifier_in_affiliation() {
    let raw = datacite(json!({
        "doi": "10.5878/abc",
        "publisher": "Zenodo",
        "creators": [{
            "name": "Doe, Jane",
            "affiliation": [{"name": "Somewhere", "affiliationIdentifier": "012a77v79"}]
        }]
    }));
    let record = Registry::DataCite.parse(&raw).unwrap();
    let evidence = classify(&record, &lund());

    assert_eq!(evidence.is_publisher(), Some(false));
    assert_eq!(evidence.have_creator_affiliation(), Some(true));
    assert!(evidence.creators.unwrap().by_identifier);
}

#[test]
fn test_string_affiliations_match_by_name() {
    let raw = datacite(json!({
        "doi": "10.5878/abc",
        "contributors": [{"name": "Smith, J", "affiliation": ["Lunds universitet"]}]
    }));
    let record = Registry::DataCite.parse(&raw).unwrap();
    let evidence = classify(&record, &lund());

    assert_eq!(evidence.have_contributor_affiliation(), Some(true));
    assert!(evidence.contributors.unwrap().by_name);
    assert_eq!(evidence.have_creator_affiliation(), Some(false));
}

#[test]
fn test_funder_evidence() {
    let raw = datacite(json!({
        "doi": "10.5878/abc",
        "fundingReferences": [{"funderName": "Lund University Research Fund"}]
    }));
    let record = Registry::DataCite.parse(&raw).unwrap();
    let evidence = classify(&record, &lund());
    assert_eq!(evidence.is_funder(), Some(true));
}

#[test]
fn test_over_fetched_record_has_no_evidence() {
    let raw = datacite(json!({
        "doi": "10.5878/abc",
        "publisher": {"name": "Zenodo"},
        "creators": [{"name": "Lundgren, A", "affiliation": ["Uppsala University"]}]
    }));
    let record = Registry::DataCite.parse(&raw).unwrap();
    let evidence = classify(&record, &lund());
    assert!(!evidence.any());
}

#[test]
fn test_contributor_checks_stop_at_first_hit() {
    let contributor = Contributor {
        name: Some("Lund University".into()),
        affiliations: vec![],
        identifiers: vec![LUND_ROR.into()],
    };
    assert_eq!(match_contributor(&contributor, &lund()), Some(EvidenceKind::Identifier));
}

// =============================================================================
// Affiliation Matcher on OpenAlex records
// =============================================================================

#[test]
fn test_openalex_institution_ror() {
    let raw = json!({
        "id": "https://openalex.org/W1",
        "doi": "https://doi.org/10.5878/abc",
        "authorships": [{
            "author": {"display_name": "Jane Doe"},
            "institutions": [{"display_name": "Lund University", "ror": LUND_ROR}]
        }]
    });
    let record = Registry::OpenAlex.parse(&raw).unwrap();
    let evidence = classify(&record, &lund());

    assert_eq!(evidence.have_creator_affiliation(), Some(true));
    assert_eq!(evidence.is_publisher(), None);
    assert_eq!(evidence.have_contributor_affiliation(), None);
}

#[test]
fn test_name_only_identity() {
    let identity = OrganizationIdentity::new(["*Lund*"], None).unwrap();
    let raw = json!({
        "doi": "https://doi.org/10.5878/abc",
        "authorships": [{"raw_affiliation_strings": ["Dept. of Physics, Lund"]}]
    });
    let record = Registry::OpenAlex.parse(&raw).unwrap();
    assert_eq!(classify(&record, &identity).have_creator_affiliation(), Some(true));
}
