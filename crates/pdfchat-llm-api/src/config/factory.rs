use std::path::PathBuf;
use std::sync::Arc;

use pdfchat_types::{ApiKey, Result};

use crate::client::{LlmClient, OpenAiClient};
use crate::config::{validate_api_url, OPENAI_API_URL};

/// Transport-independent client settings
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Print request/response debugging to the console
    pub verbose: bool,
    /// Write every request body into this directory
    pub request_log_dir: Option<PathBuf>,
}

/// Client factory for creating LLM clients
pub struct ClientFactory;

impl ClientFactory {
    /// Create a client for an already validated key
    ///
    /// # Arguments
    /// * `api_key` - Validated provider key
    /// * `api_url` - Optional custom API URL (uses the OpenAI endpoint if None)
    /// * `options` - Logging options
    pub fn create(
        api_key: ApiKey,
        api_url: Option<String>,
        options: ClientOptions,
    ) -> Result<Arc<dyn LlmClient>> {
        let url = validate_api_url(api_url.as_deref().unwrap_or(OPENAI_API_URL))?;

        Ok(Arc::new(
            OpenAiClient::new(api_key, url)
                .with_verbose(options.verbose)
                .with_request_log_dir(options.request_log_dir),
        ))
    }

    /// Validate a raw key string and create a client.
    ///
    /// A key that fails the format check never produces a client, so no
    /// request can be sent with it.
    pub fn create_from_raw_key(
        raw_key: &str,
        api_url: Option<String>,
        options: ClientOptions,
    ) -> Result<Arc<dyn LlmClient>> {
        let api_key = ApiKey::parse(raw_key)?;
        Self::create(api_key, api_url, options)
    }
}
