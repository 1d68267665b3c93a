use pdfchat_types::{ChatError, Result};

pub mod factory;
pub use factory::{ClientFactory, ClientOptions};

/// Default OpenAI API URL
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Normalize API URL by ensuring it has the correct path for OpenAI-compatible endpoints
pub fn normalize_api_url(url: &str) -> String {
    let url = url.trim();

    // If URL already contains a path with "completions", use it as-is
    if url.contains("/completions") || url.contains("/chat") {
        return url.to_string();
    }

    if url.ends_with('/') {
        format!("{}v1/chat/completions", url)
    } else {
        format!("{}/v1/chat/completions", url)
    }
}

/// Normalize and check that the result is an http(s) URL
pub fn validate_api_url(url: &str) -> Result<String> {
    let normalized = normalize_api_url(url);
    let parsed = reqwest::Url::parse(&normalized)
        .map_err(|e| ChatError::InvalidConfig(format!("invalid API URL '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(normalized),
        other => Err(ChatError::InvalidConfig(format!(
            "unsupported URL scheme '{}' in '{}'",
            other, url
        ))),
    }
}
