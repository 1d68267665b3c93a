//! # pdfchat-llm-api
//!
//! Streaming access to an OpenAI-compatible chat completions endpoint.
//!
//! ## Features
//!
//! - **Single trait**: `LlmClient` hides the transport so callers (and tests)
//!   can substitute their own provider
//! - **SSE decoding**: `data:` events are reassembled across network chunks
//! - **Validated credentials**: clients can only be built from an `ApiKey`
//!
//! ## Example
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use pdfchat_llm_api::{ClientFactory, ClientOptions};
//! use pdfchat_models::ChatRequest;
//! use pdfchat_types::{Message, ModelConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ClientFactory::create_from_raw_key("sk-...", None, ClientOptions::default())?;
//!
//!     let request = ChatRequest::streaming(&[Message::user_text("Hello!")], &ModelConfig::default());
//!     let mut fragments = client.chat_streaming(request).await?;
//!     while let Some(fragment) = fragments.next().await {
//!         print!("{}", fragment?);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use client::{
    FragmentStream,
    LlmClient,
    OpenAiClient,
    SseDecoder,
};

pub use config::{
    ClientFactory,
    ClientOptions,
    OPENAI_API_URL,
    normalize_api_url,
    validate_api_url,
};
