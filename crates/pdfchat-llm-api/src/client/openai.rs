use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use std::path::PathBuf;

use pdfchat_logging::{log_request, log_request_to_file, log_response, log_stream_chunk};
use pdfchat_models::{ApiErrorBody, ChatRequest, StreamChunk};
use pdfchat_types::{ApiKey, ChatError, Result};

use crate::client::{network_error, FragmentStream, LlmClient, SseDecoder};

/// Client for OpenAI-compatible `/v1/chat/completions` endpoints
pub struct OpenAiClient {
    api_key: ApiKey,
    api_url: String,
    client: reqwest::Client,
    verbose: bool,
    request_log_dir: Option<PathBuf>,
}

impl OpenAiClient {
    pub fn new(api_key: ApiKey, api_url: String) -> Self {
        Self {
            api_key,
            api_url,
            client: reqwest::Client::new(),
            verbose: false,
            request_log_dir: None,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_request_log_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.request_log_dir = dir;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

/// What a single `data:` payload means for the reply
#[derive(Debug)]
enum StreamEvent {
    Fragment(String),
    Done,
    Failed(ChatError),
    Ignored,
}

fn interpret_event(data: &str) -> StreamEvent {
    if data.trim() == "[DONE]" {
        return StreamEvent::Done;
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => match chunk.error {
            Some(error) => StreamEvent::Failed(ChatError::provider(None, error.message)),
            None => StreamEvent::Fragment(chunk.delta_text().unwrap_or_default().to_string()),
        },
        Err(_) => match serde_json::from_str::<serde_json::Value>(data) {
            // An error of an unexpected shape still ends the reply
            Ok(serde_json::Value::Object(mut fields)) => match fields.remove("error") {
                Some(error) => StreamEvent::Failed(ChatError::provider(None, error_message(error))),
                None => StreamEvent::Ignored,
            },
            _ => StreamEvent::Ignored,
        },
    }
}

fn error_message(error: serde_json::Value) -> String {
    if let Some(message) = error.as_str() {
        return message.to_string();
    }
    match error.get("message").and_then(|m| m.as_str()) {
        Some(message) => message.to_string(),
        None => error.to_string(),
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat_streaming(&self, request: ChatRequest) -> Result<FragmentStream> {
        log_request(&self.api_url, &request, &self.api_key, self.verbose);

        if let Some(dir) = &self.request_log_dir {
            let _ = log_request_to_file(dir, &self.api_url, &request, &self.api_key);
        }

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(&request)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            log_response(&status, &headers, &error_body, self.verbose);

            return Err(ChatError::provider(
                Some(status.as_u16()),
                ApiErrorBody::message_from(&error_body),
            ));
        }

        let verbose = self.verbose;
        let mut byte_stream = response.bytes_stream();

        let fragments = stream! {
            let mut decoder = SseDecoder::new();
            let mut chunk_counter = 0;

            while let Some(chunk_result) = byte_stream.next().await {
                let bytes = match chunk_result {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        yield Err(network_error(e));
                        return;
                    }
                };

                for data in decoder.push(&bytes) {
                    chunk_counter += 1;
                    log_stream_chunk(chunk_counter, &data, verbose);

                    match interpret_event(&data) {
                        StreamEvent::Fragment(text) => {
                            yield Ok(text);
                        }
                        StreamEvent::Done => return,
                        StreamEvent::Failed(err) => {
                            yield Err(err);
                            return;
                        }
                        StreamEvent::Ignored => {}
                    }
                }
            }

            // Connection closed without [DONE]; honour a final unterminated event
            if let Some(data) = decoder.finish() {
                match interpret_event(&data) {
                    StreamEvent::Fragment(text) => {
                        yield Ok(text);
                    }
                    StreamEvent::Failed(err) => {
                        yield Err(err);
                    }
                    StreamEvent::Done | StreamEvent::Ignored => {}
                }
            }
        };

        Ok(fragments.boxed())
    }

    fn describe(&self) -> String {
        format!("openai-compatible ({})", self.api_url)
    }
}
