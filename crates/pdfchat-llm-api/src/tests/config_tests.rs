use crate::config::{normalize_api_url, validate_api_url, ClientFactory, ClientOptions, OPENAI_API_URL};
use pdfchat_types::ChatError;

#[test]
fn test_normalize_full_url_unchanged() {
    assert_eq!(normalize_api_url(OPENAI_API_URL), OPENAI_API_URL);
}

#[test]
fn test_normalize_bare_host() {
    assert_eq!(
        normalize_api_url("http://localhost:8080"),
        "http://localhost:8080/v1/chat/completions"
    );
}

#[test]
fn test_normalize_trailing_slash() {
    assert_eq!(
        normalize_api_url("http://localhost:8080/"),
        "http://localhost:8080/v1/chat/completions"
    );
}

#[test]
fn test_validate_rejects_garbage_and_other_schemes() {
    assert!(matches!(validate_api_url("not a url"), Err(ChatError::InvalidConfig(_))));
    assert!(matches!(validate_api_url("ftp://example.com"), Err(ChatError::InvalidConfig(_))));
    assert!(validate_api_url("https://example.com").is_ok());
}

#[test]
fn test_factory_rejects_malformed_key() {
    let result = ClientFactory::create_from_raw_key("abc123", None, ClientOptions::default());
    assert!(matches!(result, Err(ChatError::Credential(_))));
}

#[test]
fn test_factory_describes_endpoint() {
    let client = ClientFactory::create_from_raw_key(
        "sk-test",
        Some("http://localhost:9999".to_string()),
        ClientOptions::default(),
    )
    .unwrap();
    assert_eq!(
        client.describe(),
        "openai-compatible (http://localhost:9999/v1/chat/completions)"
    );
}
