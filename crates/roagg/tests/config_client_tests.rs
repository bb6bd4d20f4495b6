//! Configuration and client construction tests.

use roagg::client::RegistryClient;
use roagg::config::{Config, api};

// =============================================================================
// Config
// =============================================================================

#[test]
fn test_default_config_targets_public_apis() {
    let config = Config::default();
    assert!(!config.has_mailto());
    assert_eq!(config.openaire_api_url, api::OPENAIRE_API);
    assert_eq!(config.openalex_api_url, api::OPENALEX_API);
    assert_eq!(config.ror_api_url, api::ROR_API);
    assert_eq!(config.datacite_page_size, 1000);
    assert_eq!(config.openalex_page_size, 200);
}

#[test]
fn test_config_clone_preserves_mailto() {
    let config = Config::new(Some("data@example.org".to_string()));
    let cloned = config.clone();
    assert_eq!(cloned.mailto.as_deref(), Some("data@example.org"));
}

#[test]
fn test_testing_config_uses_small_pages() {
    let config = Config::for_testing("http://localhost:1234");
    assert_eq!(config.datacite_api_url, "http://localhost:1234/datacite");
    assert_eq!(config.datacite_page_size, 2);
    assert_eq!(config.openaire_page_size, 2);
}

// =============================================================================
// Client
// =============================================================================

#[test]
fn test_client_reports_mailto() {
    let client = RegistryClient::new(Config::new(Some("data@example.org".to_string()))).unwrap();
    assert!(client.has_mailto());
    assert_eq!(client.config().mailto.as_deref(), Some("data@example.org"));

    let anonymous = RegistryClient::new(Config::default()).unwrap();
    assert!(!anonymous.has_mailto());
}

#[test]
fn test_client_debug_hides_contact_address() {
    let client = RegistryClient::new(Config::new(Some("private@example.org".to_string()))).unwrap();
    let debug = format!("{client:?}");
    assert!(!debug.contains("private@example.org"));
    assert!(debug.contains("has_mailto"));
}
