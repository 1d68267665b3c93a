use async_trait::async_trait;
use futures::stream::BoxStream;

use pdfchat_models::ChatRequest;
use pdfchat_types::{ChatError, Result};

pub mod openai;
pub mod sse;

pub use openai::OpenAiClient;
pub use sse::SseDecoder;

/// Single-pass sequence of text fragments from one completion
pub type FragmentStream = BoxStream<'static, Result<String>>;

/// LLM client trait - the provider seen as a streaming text service
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Open a streaming completion. Errors before the first fragment are
    /// returned directly; errors after it arrive as stream items.
    async fn chat_streaming(&self, request: ChatRequest) -> Result<FragmentStream>;

    /// Identifier used in log output
    fn describe(&self) -> String {
        "llm".to_string()
    }
}

/// Convert transport failures into the shared taxonomy
pub(crate) fn network_error(err: reqwest::Error) -> ChatError {
    ChatError::Network(err.to_string())
}
