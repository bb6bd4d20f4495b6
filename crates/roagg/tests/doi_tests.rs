//! DOI validation, extraction and normalization tests.

use roagg::doi::{DoiKey, extract_all, extract_from_url, is_valid, normalize_url, strip_resolver_prefix};

// =============================================================================
// is_valid
// =============================================================================

#[test]
fn test_valid_doi_basic() {
    assert!(is_valid("10.1234/example"));
    assert!(is_valid("10.123456789/test"));
}

#[test]
fn test_valid_doi_with_special_characters() {
    for doi in [
        "10.1000/test-example_123",
        "10.1000/test.example",
        "10.1000/test(123)",
        "10.1000/test;123",
        "10.1000/test:123",
        "10.1000/test/subpath",
    ] {
        assert!(is_valid(doi), "{doi} should be valid");
    }
}

#[test]
fn test_valid_doi_case_and_digits() {
    assert!(is_valid("10.1234/ABC-DEF"));
    assert!(is_valid("10.1234/Test-Example"));
    assert!(is_valid("10.1234/123456789"));
}

#[test]
fn test_valid_doi_real_world() {
    assert!(is_valid("10.1000/182"));
    assert!(is_valid("10.1038/nphys1170"));
    assert!(is_valid("10.1016/j.cell.2009.01.002"));
}

#[test]
fn test_invalid_doi_prefix() {
    assert!(!is_valid("11.1234/example"));
    assert!(!is_valid("1.1234/example"));
    assert!(!is_valid("1234/example"));
    assert!(!is_valid("10.abcd/example"));
    assert!(!is_valid("10."));
}

#[test]
fn test_invalid_doi_prefix_length() {
    assert!(!is_valid("10.123/example"));
    assert!(!is_valid("10.12/example"));
    assert!(!is_valid("10.1/example"));
    assert!(!is_valid("10.1234567890/example"));
    assert!(is_valid("10.1000/a"));
    assert!(is_valid("10.123456789/a"));
}

#[test]
fn test_invalid_doi_structure() {
    assert!(!is_valid("10.1234-example"));
    assert!(!is_valid("10.1234.example"));
    assert!(!is_valid("10.1234/"));
    assert!(!is_valid("10.1234"));
    assert!(!is_valid(""));
}

#[test]
fn test_invalid_doi_whitespace() {
    assert!(!is_valid("10.1234/ example"));
    assert!(!is_valid("10.1234 /example"));
    assert!(!is_valid(" 10.1234/example"));
    assert!(!is_valid("10.1234/example "));
}

// =============================================================================
// extract_all
// =============================================================================

#[test]
fn test_extract_from_vendor_doi_urls() {
    assert_eq!(extract_all("https://doi.pangaea.de/10.1234/example"), vec!["10.1234/example"]);
    assert_eq!(extract_all("https://zenodo.org/doi/10.1234/example"), vec!["10.1234/example"]);
}

#[test]
fn test_extract_in_order() {
    assert_eq!(
        extract_all("See 10.1234/first and also 10.5678/second for more info."),
        vec!["10.1234/first", "10.5678/second"]
    );
}

#[test]
fn test_extract_at_text_edges() {
    assert_eq!(extract_all("10.1234/example is the DOI for this article."), vec!["10.1234/example"]);
    assert_eq!(extract_all("The DOI for this article is 10.1234/example"), vec!["10.1234/example"]);
}

#[test]
fn test_extract_special_characters() {
    let found = extract_all("DOI: 10.1038/nphys1170 and 10.1016/j.cell.2009.01.002");
    assert_eq!(found, vec!["10.1038/nphys1170", "10.1016/j.cell.2009.01.002"]);

    assert!(extract_all("See DOI 10.1234/test(2024) for details.").contains(&"10.1234/test(2024)".to_string()));
    assert!(extract_all("DOI: 10.1234/test_example_123").contains(&"10.1234/test_example_123".to_string()));
    assert!(extract_all("DOI: 10.1234/AbCdEf123").contains(&"10.1234/AbCdEf123".to_string()));
}

#[test]
fn test_extract_nothing() {
    assert!(extract_all("This text has no DOI at all.").is_empty());
    assert!(extract_all("").is_empty());
    assert!(extract_all("This is not a valid DOI: 10.123/test").is_empty());
}

#[test]
fn test_extract_prefix_length_bounds() {
    assert_eq!(extract_all("The DOI is 10.1000/test"), vec!["10.1000/test"]);
    assert_eq!(extract_all("The DOI is 10.123456789/test"), vec!["10.123456789/test"]);
}

#[test]
fn test_extract_from_resolver_url_and_multiline() {
    assert!(extract_all("Visit https://doi.org/10.1234/example for the article.")
        .contains(&"10.1234/example".to_string()));

    let text = "This is a paper.
        The DOI is 10.1234/example
        It was published in 2024.";
    assert_eq!(extract_all(text), vec!["10.1234/example"]);
}

#[test]
fn test_extract_real_world() {
    let found = extract_all("See 10.1038/nature12373 and 10.1126/science.1259855 for more information.");
    assert_eq!(found, vec!["10.1038/nature12373", "10.1126/science.1259855"]);
}

// =============================================================================
// normalize_url
// =============================================================================

#[test]
fn test_zenodo_record_url_becomes_concept_doi() {
    assert_eq!(extract_from_url("https://zenodo.org/records/12345"), vec!["10.5281/zenodo.12345"]);
    assert_eq!(extract_from_url("https://zenodo.org/record/12345/files/data.csv"), vec![
        "10.5281/zenodo.12345"
    ]);
}

#[test]
fn test_vendor_hosts_move_to_resolver() {
    assert_eq!(normalize_url("https://doi.pangaea.de/10.1594/PANGAEA.1"), "https://doi.org/10.1594/PANGAEA.1");
    assert_eq!(normalize_url("https://zenodo.org/doi/10.5281/zenodo.7"), "https://doi.org/10.5281/zenodo.7");
}

#[test]
fn test_unknown_urls_are_untouched() {
    assert_eq!(normalize_url("https://example.org/dataset/1"), "https://example.org/dataset/1");
    assert!(extract_from_url("https://example.org/dataset/1").is_empty());
}

// =============================================================================
// strip_resolver_prefix / DoiKey
// =============================================================================

#[test]
fn test_strip_resolver_prefix() {
    assert_eq!(strip_resolver_prefix("https://doi.org/10.5878/abc").as_deref(), Some("10.5878/abc"));
    assert_eq!(strip_resolver_prefix("HTTPS://DX.DOI.ORG/10.5878/ABC").as_deref(), Some("10.5878/ABC"));
    assert_eq!(strip_resolver_prefix("doi:10.5878/abc").as_deref(), Some("10.5878/abc"));
    assert_eq!(strip_resolver_prefix("10.5878/abc").as_deref(), Some("10.5878/abc"));
    assert_eq!(strip_resolver_prefix("https://doi.org/"), None);
    assert_eq!(strip_resolver_prefix("not a doi"), None);
}

#[test]
fn test_doi_key_is_case_insensitive() {
    assert_eq!(DoiKey::new("10.1/ABC"), DoiKey::new("10.1/abc"));
    assert_eq!(DoiKey::from(" 10.1/Abc ").as_str(), "10.1/abc");
}
